use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::config::AppConfig;
use crate::state::AppState;

use super::cookies::{CookieJar, CookieOptions};
use super::supabase::{project_ref, AuthError, AuthProvider, AuthSession};

const REFRESH_TOKEN_MAX_AGE: i64 = 60 * 60 * 24 * 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieNames {
    pub code_verifier: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl CookieNames {
    pub fn for_project(project_ref: &str) -> Self {
        Self {
            code_verifier: format!("sb-{}-auth-token-code-verifier", project_ref),
            access_token: "sb-access-token".to_string(),
            refresh_token: "sb-refresh-token".to_string(),
        }
    }
}

/// Auth client bound to one request's cookies
pub struct SessionClient {
    provider: Arc<dyn AuthProvider>,
    jar: CookieJar,
    names: CookieNames,
    options: CookieOptions,
}

impl SessionClient {
    pub fn new(provider: Arc<dyn AuthProvider>, jar: CookieJar, config: &AppConfig) -> Self {
        Self {
            provider,
            jar,
            names: CookieNames::for_project(&project_ref(&config.supabase.url)),
            options: CookieOptions {
                secure: config.security.cookie_secure,
                ..CookieOptions::default()
            },
        }
    }

    /// Exchange an authorization code using the PKCE verifier stored by the
    /// browser, then persist the resulting session in cookies.
    pub async fn exchange_code_for_session(&mut self, code: &str) -> Result<AuthSession, AuthError> {
        let verifier = self.jar.get(&self.names.code_verifier).map(str::to_owned);
        let session = self
            .provider
            .exchange_code_for_session(code, verifier.as_deref())
            .await?;

        self.persist(&session);
        self.jar.remove(self.names.code_verifier.clone(), &self.options);
        Ok(session)
    }

    pub fn persist(&mut self, session: &AuthSession) {
        let access = CookieOptions {
            max_age: session.expires_in,
            ..self.options.clone()
        };
        let refresh = CookieOptions {
            max_age: Some(REFRESH_TOKEN_MAX_AGE),
            ..self.options.clone()
        };
        self.jar.set(self.names.access_token.clone(), session.access_token.clone(), &access);
        self.jar.set(self.names.refresh_token.clone(), session.refresh_token.clone(), &refresh);
    }

    /// Expire the session cookies. Returns whether a session was present.
    pub fn sign_out(&mut self) -> bool {
        let had_session = self.jar.get(&self.names.access_token).is_some()
            || self.jar.get(&self.names.refresh_token).is_some();
        self.jar.remove(self.names.access_token.clone(), &self.options);
        self.jar.remove(self.names.refresh_token.clone(), &self.options);
        had_session
    }

    /// Cookie changes to attach to the response
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SessionClient {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(SessionClient::new(state.auth.clone(), jar, &state.config))
    }
}
