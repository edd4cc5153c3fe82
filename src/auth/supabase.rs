use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::SupabaseConfig;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authorization code")]
    MissingCode,

    #[error("Auth provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth provider rejected the exchange ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Tokens returned by the provider after a successful code exchange
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Trade a PKCE authorization code (and its verifier) for a session
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, AuthError>;
}

/// GoTrue client for the hosted auth service
pub struct SupabaseAuthClient {
    http: reqwest::Client,
    url: String,
    anon_key: String,
}

impl SupabaseAuthClient {
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error_description: Option<String>,
    msg: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl AuthProvider for SupabaseAuthClient {
    async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, AuthError> {
        if code.trim().is_empty() {
            return Err(AuthError::MissingCode);
        }

        let response = self
            .http
            .post(format!("{}/auth/v1/token", self.url))
            .query(&[("grant_type", "pkce")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&json!({
                "auth_code": code,
                "code_verifier": code_verifier.unwrap_or_default(),
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderError>(&body)
                .ok()
                .and_then(|e| e.error_description.or(e.msg).or(e.error))
                .unwrap_or(body);
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<AuthSession>().await?)
    }
}

/// Project reference: the first label of the provider's host name.
pub fn project_ref(supabase_url: &str) -> String {
    url::Url::parse(supabase_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.split('.').next().unwrap_or(h).to_string()))
        .unwrap_or_else(|| "local".to_string())
}
