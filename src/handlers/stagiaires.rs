use axum::extract::State;
use uuid::Uuid;

use crate::database::models::{Stagiaire, StagiaireFilters, StagiairesStats};
use crate::middleware::{ApiPath, ApiQuery, ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/stagiaires - filtered by statut, tuteurId and departement
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<StagiaireFilters>,
) -> ApiResult<Vec<Stagiaire>> {
    let stagiaires = state.stagiaires.get_all(filters).await?;
    Ok(ApiResponse::success(stagiaires))
}

/// GET /api/stagiaires/:id
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Stagiaire> {
    let stagiaire = state.stagiaires.get_by_id(id).await?;
    Ok(ApiResponse::success(stagiaire))
}

/// GET /api/stagiaires/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<StagiairesStats> {
    let stats = state.stagiaires.get_stats().await?;
    Ok(ApiResponse::success(stats))
}
