use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::{Document, DocumentFilters, DocumentStatut, DocumentsStats};
use crate::database::query::and_eq;

use super::ServiceResult;

#[async_trait]
pub trait DocumentService: Send + Sync {
    async fn get_all(&self, filters: DocumentFilters) -> ServiceResult<Vec<Document>>;

    async fn get_stats(&self) -> ServiceResult<DocumentsStats>;
}

pub struct PgDocumentService {
    pool: PgPool,
}

impl PgDocumentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentService for PgDocumentService {
    async fn get_all(&self, filters: DocumentFilters) -> ServiceResult<Vec<Document>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM documents WHERE TRUE");
        and_eq(&mut qb, "stagiaire_id", filters.stagiaire_id);
        and_eq(&mut qb, "type_document", filters.type_document);
        and_eq(&mut qb, "statut", filters.statut);
        qb.push(" ORDER BY created_at DESC");

        let documents = qb.build_query_as::<Document>().fetch_all(&self.pool).await?;
        Ok(documents)
    }

    async fn get_stats(&self) -> ServiceResult<DocumentsStats> {
        let rows: Vec<(String, DocumentStatut, i64, i64)> = sqlx::query_as(
            "SELECT type_document, statut, COUNT(*),
                    COUNT(*) FILTER (WHERE created_at >= date_trunc('month', now()))
             FROM documents
             GROUP BY type_document, statut",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DocumentsStats::from_counts(&rows))
    }
}
