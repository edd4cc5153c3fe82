use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_statut", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatut {
    Brouillon,
    Genere,
    Signe,
    Archive,
}

impl DocumentStatut {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatut::Brouillon => "brouillon",
            DocumentStatut::Genere => "genere",
            DocumentStatut::Signe => "signe",
            DocumentStatut::Archive => "archive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub nom: String,
    #[serde(rename = "type")]
    pub type_document: String,
    pub statut: DocumentStatut,
    pub template_id: Option<Uuid>,
    pub stagiaire_id: Option<Uuid>,
    /// Size in bytes of the generated file
    pub taille: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Query string of GET /api/documents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilters {
    pub stagiaire_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub type_document: Option<String>,
    pub statut: Option<DocumentStatut>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentsStats {
    pub total: i64,
    pub ce_mois: i64,
    pub par_type: BTreeMap<String, i64>,
    pub par_statut: BTreeMap<String, i64>,
}

impl DocumentsStats {
    /// Fold `(type, statut, count, count_this_month)` groups.
    pub fn from_counts(rows: &[(String, DocumentStatut, i64, i64)]) -> Self {
        let mut stats = Self::default();
        for (type_document, statut, count, this_month) in rows {
            stats.total += count;
            stats.ce_mois += this_month;
            *stats.par_type.entry(type_document.clone()).or_insert(0) += count;
            *stats.par_statut.entry(statut.as_str().to_string()).or_insert(0) += count;
        }
        stats
    }
}
