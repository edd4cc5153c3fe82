use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub titre: String,
    pub message: String,
    #[serde(rename = "type")]
    pub type_notification: String,
    pub lu: bool,
    pub lien: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query string of GET /api/notifications
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub unread_only: bool,
}

/// Body of PUT /api/notifications/mark-all-read. `user_id` stays optional so
/// the handler can answer its own 400 instead of a generic rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadRequest {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAllReadResult {
    pub updated: u64,
}
