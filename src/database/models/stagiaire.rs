use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stagiaire_statut", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StagiaireStatut {
    EnAttente,
    Actif,
    Termine,
    Abandonne,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stagiaire {
    pub id: Uuid,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub telephone: Option<String>,
    pub etablissement: Option<String>,
    pub niveau: Option<String>,
    pub specialite: Option<String>,
    pub departement: Option<String>,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub statut: StagiaireStatut,
    pub tuteur_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query string of GET /api/stagiaires
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagiaireFilters {
    pub statut: Option<StagiaireStatut>,
    pub tuteur_id: Option<Uuid>,
    pub departement: Option<String>,
}

/// Label used for interns without a department in `par_departement`
pub const SANS_DEPARTEMENT: &str = "non_renseigne";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagiairesStats {
    pub total: i64,
    pub en_attente: i64,
    pub actifs: i64,
    pub termines: i64,
    pub abandonnes: i64,
    pub sans_tuteur: i64,
    pub par_departement: BTreeMap<String, i64>,
}

impl StagiairesStats {
    /// Fold `(statut, departement, count, count_without_tutor)` groups.
    pub fn from_counts(rows: &[(StagiaireStatut, Option<String>, i64, i64)]) -> Self {
        let mut stats = Self::default();
        for (statut, departement, count, sans_tuteur) in rows {
            stats.total += count;
            stats.sans_tuteur += sans_tuteur;
            match statut {
                StagiaireStatut::EnAttente => stats.en_attente += count,
                StagiaireStatut::Actif => stats.actifs += count,
                StagiaireStatut::Termine => stats.termines += count,
                StagiaireStatut::Abandonne => stats.abandonnes += count,
            }
            let key = departement
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(SANS_DEPARTEMENT);
            *stats.par_departement.entry(key.to_string()).or_insert(0) += count;
        }
        stats
    }
}
