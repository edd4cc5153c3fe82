use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::database::models::{MarkAllReadResult, Notification};

use super::{ServiceError, ServiceResult};

#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Newest first; `unread_only` drops notifications already read
    async fn get_for_user(&self, user_id: Uuid, unread_only: bool) -> ServiceResult<Vec<Notification>>;

    async fn mark_as_read(&self, id: Uuid) -> ServiceResult<Notification>;

    async fn mark_all_as_read(&self, user_id: Uuid) -> ServiceResult<MarkAllReadResult>;
}

pub struct PgNotificationService {
    pool: PgPool,
}

impl PgNotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationService for PgNotificationService {
    async fn get_for_user(&self, user_id: Uuid, unread_only: bool) -> ServiceResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications
             WHERE user_id = $1 AND (NOT $2 OR NOT lu)
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    async fn mark_as_read(&self, id: Uuid) -> ServiceResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET lu = true WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("Notification {} introuvable", id)))
    }

    async fn mark_all_as_read(&self, user_id: Uuid) -> ServiceResult<MarkAllReadResult> {
        let result = sqlx::query("UPDATE notifications SET lu = true WHERE user_id = $1 AND NOT lu")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let updated = result.rows_affected();
        info!("Marked {} notifications read for user {}", updated, user_id);
        Ok(MarkAllReadResult { updated })
    }
}
