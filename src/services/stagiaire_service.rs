use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::models::{Stagiaire, StagiaireFilters, StagiaireStatut, StagiairesStats};
use crate::database::query::and_eq;

use super::{ServiceError, ServiceResult};

#[async_trait]
pub trait StagiaireService: Send + Sync {
    async fn get_all(&self, filters: StagiaireFilters) -> ServiceResult<Vec<Stagiaire>>;

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Stagiaire>;

    async fn get_stats(&self) -> ServiceResult<StagiairesStats>;
}

pub struct PgStagiaireService {
    pool: PgPool,
}

impl PgStagiaireService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StagiaireService for PgStagiaireService {
    async fn get_all(&self, filters: StagiaireFilters) -> ServiceResult<Vec<Stagiaire>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM stagiaires WHERE TRUE");
        and_eq(&mut qb, "statut", filters.statut);
        and_eq(&mut qb, "tuteur_id", filters.tuteur_id);
        and_eq(&mut qb, "departement", filters.departement);
        qb.push(" ORDER BY nom, prenom");

        let stagiaires = qb.build_query_as::<Stagiaire>().fetch_all(&self.pool).await?;
        Ok(stagiaires)
    }

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Stagiaire> {
        sqlx::query_as::<_, Stagiaire>("SELECT * FROM stagiaires WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Stagiaire {} introuvable", id)))
    }

    async fn get_stats(&self) -> ServiceResult<StagiairesStats> {
        let rows: Vec<(StagiaireStatut, Option<String>, i64, i64)> = sqlx::query_as(
            "SELECT statut, departement, COUNT(*), COUNT(*) FILTER (WHERE tuteur_id IS NULL)
             FROM stagiaires
             GROUP BY statut, departement",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(StagiairesStats::from_counts(&rows))
    }
}
