use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Full application router with global middleware
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Public
        .route("/", get(handlers::pages::index))
        .route("/health", get(handlers::system::health))
        .route("/api", get(handlers::system::api_index))
        .route("/partials/stats/:domain", get(handlers::pages::stats_partial))
        // API
        .merge(demande_routes())
        .merge(document_routes())
        .merge(notification_routes())
        .merge(stagiaire_routes())
        .merge(template_routes())
        .merge(user_routes())
        .merge(auth_routes())
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security.cors_origins, config.is_development()))
        .with_state(state);

    if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn cors_layer(origins: &[String], development: bool) -> CorsLayer {
    if development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

fn demande_routes() -> Router<AppState> {
    use handlers::demandes;

    Router::new()
        .route("/api/demandes", get(demandes::list).post(demandes::create))
        .route("/api/demandes/stats", get(demandes::stats))
        .route("/api/demandes/:id", get(demandes::get))
        .route("/api/demandes/:id/approve", post(demandes::approve))
        .route("/api/demandes/:id/reject", post(demandes::reject))
        .route(
            "/api/demandes/:id/comments",
            get(demandes::list_comments).post(demandes::add_comment),
        )
}

fn document_routes() -> Router<AppState> {
    use handlers::documents;

    Router::new()
        .route("/api/documents", get(documents::list))
        .route("/api/documents/stats", get(documents::stats))
}

fn notification_routes() -> Router<AppState> {
    use handlers::notifications;

    Router::new()
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/mark-all-read", put(notifications::mark_all_as_read))
        .route("/api/notifications/:id/read", put(notifications::mark_as_read))
}

fn stagiaire_routes() -> Router<AppState> {
    use handlers::stagiaires;

    Router::new()
        .route("/api/stagiaires", get(stagiaires::list))
        .route("/api/stagiaires/stats", get(stagiaires::stats))
        .route("/api/stagiaires/:id", get(stagiaires::get))
}

fn template_routes() -> Router<AppState> {
    use handlers::templates;

    Router::new()
        .route("/api/templates", get(templates::list).post(templates::create))
        .route("/api/templates/:id", get(templates::get))
        .route("/api/templates/:id/generate", post(templates::generate))
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new().route("/api/users", get(users::list).post(users::create))
}

fn auth_routes() -> Router<AppState> {
    use handlers::{auth, dev};

    Router::new()
        .route("/api/auth/callback", get(auth::callback))
        .route("/api/auth/signout", post(auth::sign_out))
        .route("/api/dev/disable-email-confirmation", get(dev::disable_email_confirmation))
}
