use axum::{extract::State, response::Html};

use crate::error::ApiError;
use crate::middleware::ApiPath;
use crate::state::AppState;
use crate::views::{self, page, StatsDomain};

/// GET / - admin shell
pub async fn index() -> Html<String> {
    Html(views::index_page("Gestion des stagiaires").into_string())
}

/// GET /partials/stats/:domain - stat cards for demandes, documents or stagiaires
pub async fn stats_partial(
    State(state): State<AppState>,
    ApiPath(domain): ApiPath<String>,
) -> Result<Html<String>, ApiError> {
    let domain = StatsDomain::parse(&domain)
        .ok_or_else(|| ApiError::not_found(format!("Section inconnue: {}", domain)))?;

    let cards = match domain {
        StatsDomain::Demandes => page::demandes_cards(&state.demandes.get_stats().await?),
        StatsDomain::Documents => page::documents_cards(&state.documents.get_stats().await?),
        StatsDomain::Stagiaires => page::stagiaires_cards(&state.stagiaires.get_stats().await?),
    };

    Ok(Html(views::stats_fragment(domain, &cards).into_string()))
}
