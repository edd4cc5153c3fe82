use axum::extract::State;

use crate::database::models::{Document, DocumentFilters, DocumentsStats};
use crate::middleware::{ApiQuery, ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/documents - newest first, filtered by stagiaireId, type and statut
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<DocumentFilters>,
) -> ApiResult<Vec<Document>> {
    let documents = state.documents.get_all(filters).await?;
    Ok(ApiResponse::success(documents))
}

/// GET /api/documents/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<DocumentsStats> {
    let stats = state.documents.get_stats().await?;
    Ok(ApiResponse::success(stats))
}
