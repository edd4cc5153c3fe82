use axum::extract::State;

use crate::database::models::{NewUser, User, UserQuery};
use crate::middleware::{ApiJson, ApiQuery, ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/users[?role=tuteur]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> ApiResult<Vec<User>> {
    let users = match query.role {
        Some(role) => state.users.get_users_by_role(role).await?,
        None => state.users.get_all_users().await?,
    };
    Ok(ApiResponse::success(users))
}

/// POST /api/users
pub async fn create(State(state): State<AppState>, ApiJson(body): ApiJson<NewUser>) -> ApiResult<User> {
    let user = state.users.create_user(body).await?;
    Ok(ApiResponse::created(user))
}
