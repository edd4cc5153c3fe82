use axum::{
    extract::State,
    http::{header, HeaderName},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::{NewTemplate, Template, TemplateFilters};
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiPath, ApiQuery, ApiResponse, ApiResult};
use crate::state::AppState;

pub const DOCUMENT_ID_HEADER: &str = "x-document-id";

/// GET /api/templates - filtered by type and actif
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<TemplateFilters>,
) -> ApiResult<Vec<Template>> {
    let templates = state.templates.get_all(filters).await?;
    Ok(ApiResponse::success(templates))
}

/// POST /api/templates
pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewTemplate>,
) -> ApiResult<Template> {
    let template = state.templates.create(body).await?;
    Ok(ApiResponse::created(template))
}

/// GET /api/templates/:id
pub async fn get(State(state): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> ApiResult<Template> {
    let template = state.templates.get_by_id(id).await?;
    Ok(ApiResponse::success(template))
}

/// POST /api/templates/:id/generate - body is the placeholder data object;
/// responds with the PDF as an attachment and the recorded document's id in
/// `X-Document-Id`
pub async fn generate(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(data): ApiJson<Map<String, Value>>,
) -> Result<Response, ApiError> {
    let generated = state.templates.generate_document(id, data).await?;
    let document_id = generated.document_id.to_string();

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"document.pdf\"".to_string(),
            ),
            (HeaderName::from_static(DOCUMENT_ID_HEADER), document_id),
        ],
        generated.bytes,
    )
        .into_response())
}
