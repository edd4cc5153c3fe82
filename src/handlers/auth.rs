use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::auth::SessionClient;
use crate::config::AppConfig;
use crate::middleware::ApiQuery;
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/auth/login";
pub const CALLBACK_ERROR_PATH: &str = "/auth/login?error=callback_error";

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// GET /api/auth/callback?code=... - finish the provider's PKCE login
///
/// Always answers with a 302: to the site root once the session cookies are
/// set, or to the login page with `error=callback_error`.
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Option<ApiQuery<CallbackQuery>>,
    mut session: SessionClient,
) -> Response {
    let origin = request_origin(&state.config, &headers);
    let code = query
        .and_then(|ApiQuery(q)| q.code)
        .filter(|code| !code.trim().is_empty());

    let location = match code {
        Some(code) => match session.exchange_code_for_session(&code).await {
            Ok(_) => format!("{}/", origin),
            Err(e) => {
                tracing::error!("Auth callback exchange failed: {}", e);
                format!("{}{}", origin, CALLBACK_ERROR_PATH)
            }
        },
        None => {
            tracing::warn!("Auth callback called without a code");
            format!("{}{}", origin, CALLBACK_ERROR_PATH)
        }
    };

    (StatusCode::FOUND, session.into_jar(), [(header::LOCATION, location)]).into_response()
}

/// POST /api/auth/signout - expire the session cookies, then 302 to the login page
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut session: SessionClient,
) -> Response {
    let origin = request_origin(&state.config, &headers);
    if !session.sign_out() {
        tracing::debug!("Sign-out without an active session");
    }

    let location = format!("{}{}", origin, LOGIN_PATH);
    (StatusCode::FOUND, session.into_jar(), [(header::LOCATION, location)]).into_response()
}

/// Public origin for redirects: `SITE_URL` when configured, otherwise the
/// request's forwarded scheme and `Host`.
pub fn request_origin(config: &AppConfig, headers: &HeaderMap) -> String {
    if let Some(site_url) = &config.api.site_url {
        return site_url.trim_end_matches('/').to_string();
    }

    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let scheme = header_str("x-forwarded-proto").unwrap_or_else(|| "http".to_string());
    let host = header_str("x-forwarded-host")
        .or_else(|| header_str(header::HOST.as_str()))
        .unwrap_or_else(|| format!("{}:{}", config.api.host, config.api.port));
    format!("{}://{}", scheme, host)
}
