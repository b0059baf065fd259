//! Rate-limit identity resolution.
//!
//! Prefers the authenticated user behind a bearer token; falls back to the
//! client IP taken from proxy headers. Resolution never fails — a request
//! with no usable identity still gets the literal `ip:unknown` key rather
//! than an error, because admission control must run for exactly the requests
//! we know least about.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde::Deserialize;
use thiserror::Error;

/// Authenticated user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Provider examined the token and rejected it
    #[error("token rejected")]
    Rejected,

    /// Provider could not be reached or answered with a server error
    #[error("auth provider unreachable: {0}")]
    Upstream(String),
}

/// Exchanges a bearer token for a user identity (one network call).
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn user_from_token(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// Identity derived for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Present only when a bearer token verified successfully.
    pub user: Option<AuthUser>,
    /// `user:{id}` or `ip:{addr}` — always usable as a rate-limit key.
    pub rate_limit_key: String,
}

/// Derives the rate-limit key for incoming requests.
pub struct IdentityResolver {
    provider: std::sync::Arc<dyn AuthProvider>,
}

impl IdentityResolver {
    pub fn new(provider: std::sync::Arc<dyn AuthProvider>) -> Self {
        Self { provider }
    }

    /// Resolve the caller's identity from request headers.
    pub async fn resolve(&self, headers: &HeaderMap) -> ResolvedIdentity {
        if let Some(token) = bearer_token(headers) {
            match self.provider.user_from_token(token).await {
                Ok(user) => {
                    let key = format!("user:{}", user.id);
                    return ResolvedIdentity { user: Some(user), rate_limit_key: key };
                }
                Err(e) => {
                    tracing::debug!("bearer token did not resolve to a user: {}", e);
                }
            }
        }

        ResolvedIdentity { user: None, rate_limit_key: format!("ip:{}", client_ip(headers)) }
    }
}

/// Token from `Authorization: Bearer <token>`, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Client address from `X-Forwarded-For` (first entry) or `X-Real-IP`.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').map(str::trim).find(|ip| !ip.is_empty()))
        .or_else(|| headers.get("x-real-ip").and_then(|h| h.to_str().ok()).map(str::trim))
        .filter(|ip| !ip.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Supabase Auth — `GET /auth/v1/user` with the caller's token.
pub struct SupabaseAuth {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

#[derive(Deserialize)]
struct SupabaseUser {
    id: String,
    email: Option<String>,
}

impl SupabaseAuth {
    pub fn new(http: reqwest::Client, base_url: &str, service_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn user_from_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AuthError::Rejected);
        }
        if !status.is_success() {
            return Err(AuthError::Upstream(format!("HTTP {}", status.as_u16())));
        }

        let user: SupabaseUser =
            response.json().await.map_err(|e| AuthError::Upstream(e.to_string()))?;
        Ok(AuthUser { id: user.id, email: user.email })
    }
}
