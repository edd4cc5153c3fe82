use axum::extract::State;
use uuid::Uuid;

use crate::database::models::{MarkAllReadRequest, MarkAllReadResult, Notification, NotificationQuery};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/notifications?userId=...&unreadOnly=true
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NotificationQuery>,
) -> ApiResult<Vec<Notification>> {
    let notifications = state
        .notifications
        .get_for_user(query.user_id, query.unread_only)
        .await?;
    Ok(ApiResponse::success(notifications))
}

/// PUT /api/notifications/:id/read
pub async fn mark_as_read(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Notification> {
    let notification = state.notifications.mark_as_read(id).await?;
    Ok(ApiResponse::success(notification))
}

/// PUT /api/notifications/mark-all-read - body `{ "userId" }`
///
/// A missing body, a body without `userId` or an unparseable one all answer
/// `{ "error": "userId requis" }` without touching the store.
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    body: Option<ApiJson<MarkAllReadRequest>>,
) -> ApiResult<MarkAllReadResult> {
    let user_id = body
        .and_then(|ApiJson(b)| b.user_id)
        .ok_or_else(|| ApiError::bad_request("userId requis"))?;

    let result = state.notifications.mark_all_as_read(user_id).await?;
    Ok(ApiResponse::success(result))
}
