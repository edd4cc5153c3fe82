use std::collections::HashMap;
use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};

/// Attributes applied to every cookie written through a jar. Cookies are
/// always sent with `SameSite=Lax`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub path: String,
    pub http_only: bool,
    pub secure: bool,
    /// Seconds; `None` makes a session cookie
    pub max_age: Option<i64>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            http_only: true,
            secure: false,
            max_age: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Set { name: String, value: String, options: CookieOptions },
    Remove { name: String, path: String },
}

impl Pending {
    fn name(&self) -> &str {
        match self {
            Pending::Set { name, .. } | Pending::Remove { name, .. } => name,
        }
    }

    fn header_value(&self) -> String {
        match self {
            Pending::Set { name, value, options } => {
                let mut out = format!("{}={}; Path={}", name, value, options.path);
                if let Some(max_age) = options.max_age {
                    out.push_str(&format!("; Max-Age={}", max_age));
                }
                if options.http_only {
                    out.push_str("; HttpOnly");
                }
                if options.secure {
                    out.push_str("; Secure");
                }
                out.push_str("; SameSite=Lax");
                out
            }
            Pending::Remove { name, path } => format!("{}=; Path={}; Max-Age=0", name, path),
        }
    }
}

/// Request cookies plus the changes to send back as `Set-Cookie` headers.
///
/// Reads see pending writes, so a value set earlier in the same request is
/// returned by [`CookieJar::get`] and a removed one is not.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    incoming: HashMap<String, String>,
    pending: Vec<Pending>,
}

impl CookieJar {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut incoming = HashMap::new();
        for value in headers.get_all(header::COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };
            for pair in value.split(';') {
                if let Some((name, value)) = pair.trim().split_once('=') {
                    let name = name.trim();
                    if !name.is_empty() {
                        incoming.insert(name.to_string(), value.trim().trim_matches('"').to_string());
                    }
                }
            }
        }
        Self {
            incoming,
            pending: Vec::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        match self.pending.iter().rev().find(|p| p.name() == name) {
            Some(Pending::Set { value, .. }) => Some(value.as_str()),
            Some(Pending::Remove { .. }) => None,
            None => self.incoming.get(name).map(String::as_str),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>, options: &CookieOptions) {
        self.pending.push(Pending::Set {
            name: name.into(),
            value: value.into(),
            options: options.clone(),
        });
    }

    /// Expire a cookie on the client
    pub fn remove(&mut self, name: impl Into<String>, options: &CookieOptions) {
        self.pending.push(Pending::Remove {
            name: name.into(),
            path: options.path.clone(),
        });
    }

    /// `Set-Cookie` header values for the pending changes, in order
    pub fn set_cookie_headers(&self) -> Vec<String> {
        self.pending.iter().map(Pending::header_value).collect()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CookieJar
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CookieJar::from_headers(&parts.headers))
    }
}

impl IntoResponseParts for CookieJar {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        for value in self.set_cookie_headers() {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    res.headers_mut().append(header::SET_COOKIE, value);
                }
                Err(_) => tracing::warn!("Dropping cookie with invalid header characters"),
            }
        }
        Ok(res)
    }
}
