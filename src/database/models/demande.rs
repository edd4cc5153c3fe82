use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "demande_statut", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DemandeStatut {
    EnAttente,
    Approuvee,
    Rejetee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "demande_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DemandeType {
    Conge,
    Prolongation,
    Attestation,
    ChangementTuteur,
    Autre,
}

impl DemandeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemandeType::Conge => "conge",
            DemandeType::Prolongation => "prolongation",
            DemandeType::Attestation => "attestation",
            DemandeType::ChangementTuteur => "changement_tuteur",
            DemandeType::Autre => "autre",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Demande {
    pub id: Uuid,
    pub stagiaire_id: Uuid,
    pub tuteur_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub type_demande: DemandeType,
    pub titre: String,
    pub description: Option<String>,
    pub statut: DemandeStatut,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
    pub commentaire_reponse: Option<String>,
    pub motif_rejet: Option<String>,
    pub date_traitement: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of POST /api/demandes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDemande {
    pub stagiaire_id: Uuid,
    pub tuteur_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub type_demande: DemandeType,
    pub titre: String,
    pub description: Option<String>,
    pub date_debut: Option<NaiveDate>,
    pub date_fin: Option<NaiveDate>,
}

/// Query string of GET /api/demandes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandeFilters {
    pub statut: Option<DemandeStatut>,
    #[serde(rename = "type")]
    pub type_demande: Option<DemandeType>,
    pub stagiaire_id: Option<Uuid>,
    pub tuteur_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Commentaire {
    pub id: Uuid,
    pub demande_id: Uuid,
    pub auteur_id: Uuid,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Body of POST /api/demandes/:id/comments
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCommentaire {
    pub user_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandesStats {
    pub total: i64,
    pub en_attente: i64,
    pub approuvees: i64,
    pub rejetees: i64,
    pub par_type: BTreeMap<String, i64>,
}

impl DemandesStats {
    /// Fold `(statut, type, count)` groups into the dashboard summary.
    pub fn from_counts(rows: &[(DemandeStatut, DemandeType, i64)]) -> Self {
        let mut stats = Self::default();
        for (statut, type_demande, count) in rows {
            stats.total += count;
            match statut {
                DemandeStatut::EnAttente => stats.en_attente += count,
                DemandeStatut::Approuvee => stats.approuvees += count,
                DemandeStatut::Rejetee => stats.rejetees += count,
            }
            *stats.par_type.entry(type_demande.as_str().to_string()).or_insert(0) += count;
        }
        stats
    }
}
