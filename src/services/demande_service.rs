use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::database::models::{
    Commentaire, Demande, DemandeFilters, DemandeStatut, DemandeType, DemandesStats, NewCommentaire,
    NewDemande,
};
use crate::database::query::and_eq;

use super::{require_text, ServiceError, ServiceResult};

/// Internship requests and their approval workflow
#[async_trait]
pub trait DemandeService: Send + Sync {
    async fn get_all(&self, filters: DemandeFilters) -> ServiceResult<Vec<Demande>>;

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Demande>;

    async fn create(&self, demande: NewDemande) -> ServiceResult<Demande>;

    async fn get_stats(&self) -> ServiceResult<DemandesStats>;

    /// Move a pending demande to `approuvee`
    async fn approve(&self, id: Uuid, commentaire: Option<String>) -> ServiceResult<Demande>;

    /// Move a pending demande to `rejetee`
    async fn reject(&self, id: Uuid, motif: Option<String>) -> ServiceResult<Demande>;

    async fn add_commentaire(&self, id: Uuid, commentaire: NewCommentaire) -> ServiceResult<Commentaire>;

    async fn get_commentaires(&self, id: Uuid) -> ServiceResult<Vec<Commentaire>>;
}

/// Validate a creation body before it reaches the store.
pub fn validate_new_demande(demande: &NewDemande) -> ServiceResult<()> {
    require_text("titre", &demande.titre)?;
    if let (Some(debut), Some(fin)) = (demande.date_debut, demande.date_fin) {
        if fin < debut {
            return Err(ServiceError::validation(
                "La date de fin doit être postérieure à la date de début",
            ));
        }
    }
    Ok(())
}

/// Error for a transition that matched no pending row: either the demande
/// does not exist or it has already been processed.
pub fn transition_error(id: Uuid, current: Option<DemandeStatut>) -> ServiceError {
    match current {
        None => ServiceError::not_found(format!("Demande {} introuvable", id)),
        Some(DemandeStatut::Approuvee) => ServiceError::conflict("La demande a déjà été approuvée"),
        Some(DemandeStatut::Rejetee) => ServiceError::conflict("La demande a déjà été rejetée"),
        Some(DemandeStatut::EnAttente) => {
            ServiceError::conflict("La demande a été modifiée pendant le traitement")
        }
    }
}

pub struct PgDemandeService {
    pool: PgPool,
}

impl PgDemandeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn transition(
        &self,
        id: Uuid,
        target: DemandeStatut,
        commentaire: Option<String>,
        motif: Option<String>,
    ) -> ServiceResult<Demande> {
        // Guarded on the current status so two concurrent decisions cannot both win
        let updated = sqlx::query_as::<_, Demande>(
            "UPDATE demandes
             SET statut = $2,
                 commentaire_reponse = COALESCE($3, commentaire_reponse),
                 motif_rejet = COALESCE($4, motif_rejet),
                 date_traitement = now(),
                 updated_at = now()
             WHERE id = $1 AND statut = 'en_attente'
             RETURNING *",
        )
        .bind(id)
        .bind(target)
        .bind(commentaire)
        .bind(motif)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(demande) => {
                info!("Demande {} -> {:?}", id, target);
                Ok(demande)
            }
            None => {
                let current: Option<DemandeStatut> =
                    sqlx::query_scalar("SELECT statut FROM demandes WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&self.pool)
                        .await?;
                Err(transition_error(id, current))
            }
        }
    }
}

#[async_trait]
impl DemandeService for PgDemandeService {
    async fn get_all(&self, filters: DemandeFilters) -> ServiceResult<Vec<Demande>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM demandes WHERE TRUE");
        and_eq(&mut qb, "statut", filters.statut);
        and_eq(&mut qb, "type_demande", filters.type_demande);
        and_eq(&mut qb, "stagiaire_id", filters.stagiaire_id);
        and_eq(&mut qb, "tuteur_id", filters.tuteur_id);
        qb.push(" ORDER BY created_at DESC");

        let demandes = qb.build_query_as::<Demande>().fetch_all(&self.pool).await?;
        Ok(demandes)
    }

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Demande> {
        sqlx::query_as::<_, Demande>("SELECT * FROM demandes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Demande {} introuvable", id)))
    }

    async fn create(&self, demande: NewDemande) -> ServiceResult<Demande> {
        validate_new_demande(&demande)?;

        let created = sqlx::query_as::<_, Demande>(
            "INSERT INTO demandes (stagiaire_id, tuteur_id, type_demande, titre, description, date_debut, date_fin)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(demande.stagiaire_id)
        .bind(demande.tuteur_id)
        .bind(demande.type_demande)
        .bind(demande.titre.trim())
        .bind(demande.description)
        .bind(demande.date_debut)
        .bind(demande.date_fin)
        .fetch_one(&self.pool)
        .await?;

        info!("Created demande {} for stagiaire {}", created.id, created.stagiaire_id);
        Ok(created)
    }

    async fn get_stats(&self) -> ServiceResult<DemandesStats> {
        let rows: Vec<(DemandeStatut, DemandeType, i64)> = sqlx::query_as(
            "SELECT statut, type_demande, COUNT(*) FROM demandes GROUP BY statut, type_demande",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DemandesStats::from_counts(&rows))
    }

    async fn approve(&self, id: Uuid, commentaire: Option<String>) -> ServiceResult<Demande> {
        self.transition(id, DemandeStatut::Approuvee, commentaire, None).await
    }

    async fn reject(&self, id: Uuid, motif: Option<String>) -> ServiceResult<Demande> {
        self.transition(id, DemandeStatut::Rejetee, None, motif).await
    }

    async fn add_commentaire(&self, id: Uuid, commentaire: NewCommentaire) -> ServiceResult<Commentaire> {
        require_text("message", &commentaire.message)?;

        let created = sqlx::query_as::<_, Commentaire>(
            "INSERT INTO demande_commentaires (demande_id, auteur_id, message)
             SELECT $1, $2, $3
             WHERE EXISTS (SELECT 1 FROM demandes WHERE id = $1)
             RETURNING *",
        )
        .bind(id)
        .bind(commentaire.user_id)
        .bind(commentaire.message.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Demande {} introuvable", id)))?;

        info!("Added commentaire {} on demande {}", created.id, id);
        Ok(created)
    }

    async fn get_commentaires(&self, id: Uuid) -> ServiceResult<Vec<Commentaire>> {
        let commentaires = sqlx::query_as::<_, Commentaire>(
            "SELECT * FROM demande_commentaires WHERE demande_id = $1 ORDER BY created_at ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(commentaires)
    }
}
