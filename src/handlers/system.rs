use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /api - service name, version and route overview
pub async fn api_index() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Stagiaires API",
        "version": version,
        "description": "Back office de gestion des stagiaires",
        "endpoints": {
            "demandes": "/api/demandes[/:id] | /api/demandes/stats | /api/demandes/:id/{approve,reject,comments}",
            "documents": "/api/documents | /api/documents/stats",
            "notifications": "/api/notifications?userId | /api/notifications/:id/read | /api/notifications/mark-all-read",
            "stagiaires": "/api/stagiaires[/:id] | /api/stagiaires/stats",
            "templates": "/api/templates[/:id] | /api/templates/:id/generate",
            "users": "/api/users[?role]",
            "auth": "/api/auth/callback | /api/auth/signout",
            "dev": "/api/dev/disable-email-confirmation (development only)",
            "health": "/health",
        }
    }))
}

/// GET /health - 200 when the database answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "error": "Base de données indisponible"
                })),
            )
        }
    }
}
