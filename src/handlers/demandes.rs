use axum::extract::State;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{
    Commentaire, Demande, DemandeFilters, DemandesStats, NewCommentaire, NewDemande,
};
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult, OptionalJson};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ApproveBody {
    pub commentaire: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RejectBody {
    pub motif: Option<String>,
}

/// GET /api/demandes - list demandes, optionally filtered by statut, type,
/// stagiaireId and tuteurId
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<DemandeFilters>,
) -> ApiResult<Vec<Demande>> {
    let demandes = state.demandes.get_all(filters).await?;
    Ok(ApiResponse::success(demandes))
}

/// POST /api/demandes - create a pending demande
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewDemande>,
) -> ApiResult<Demande> {
    let demande = state.demandes.create(body).await?;
    Ok(ApiResponse::created(demande))
}

/// GET /api/demandes/:id
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Demande> {
    let demande = state.demandes.get_by_id(id).await?;
    Ok(ApiResponse::success(demande))
}

/// GET /api/demandes/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<DemandesStats> {
    let stats = state.demandes.get_stats().await?;
    Ok(ApiResponse::success(stats))
}

/// POST /api/demandes/:id/approve - body `{ "commentaire"?: string }`, may be empty
pub async fn approve(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    OptionalJson(body): OptionalJson<ApproveBody>,
) -> ApiResult<Demande> {
    let commentaire = body.and_then(|b| b.commentaire);
    let demande = state.demandes.approve(id, commentaire).await?;
    Ok(ApiResponse::success(demande))
}

/// POST /api/demandes/:id/reject - body `{ "motif"?: string }`, may be empty
pub async fn reject(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    OptionalJson(body): OptionalJson<RejectBody>,
) -> ApiResult<Demande> {
    let motif = body.and_then(|b| b.motif);
    let demande = state.demandes.reject(id, motif).await?;
    Ok(ApiResponse::success(demande))
}

/// POST /api/demandes/:id/comments - body `{ "userId", "message" }`
pub async fn add_comment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<NewCommentaire>,
) -> ApiResult<Commentaire> {
    let commentaire = state.demandes.add_commentaire(id, body).await?;
    Ok(ApiResponse::created(commentaire))
}

/// GET /api/demandes/:id/comments - oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Vec<Commentaire>> {
    let commentaires = state.demandes.get_commentaires(id).await?;
    Ok(ApiResponse::success(commentaires))
}
