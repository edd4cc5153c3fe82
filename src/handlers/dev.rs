use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/dev/disable-email-confirmation - how to turn off e-mail
/// confirmation on the local auth stack. Development only; changes nothing.
pub async fn disable_email_confirmation(State(state): State<AppState>) -> ApiResult<Value> {
    if !state.config.is_development() {
        return Err(ApiError::forbidden("Disponible uniquement en développement"));
    }

    Ok(ApiResponse::success(json!({
        "message": "La confirmation des e-mails se désactive dans la configuration du service d'authentification",
        "steps": [
            "Ouvrir le tableau de bord du projet (Authentication > Providers > Email)",
            "Désactiver l'option « Confirm email »",
            "En local, mettre `enable_confirmations = false` dans la section [auth.email] de supabase/config.toml puis redémarrer la stack",
        ],
        "supabaseUrl": state.config.supabase.url,
    })))
}
