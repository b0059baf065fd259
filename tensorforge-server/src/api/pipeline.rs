//! Per-request orchestration shared by every billing endpoint.
//!
//! Each request walks the same stages in order:
//!
//! ```text
//! Received -> AuthChecked -> RateLimited -> Parsed -> Sanitized -> Validated
//! ```
//!
//! The first failing stage short-circuits into an [`ApiError`] with its
//! stage-appropriate status (401 auth, 429 rate limit, 400 parse/validation).
//! Nothing is retried; one request is handled exactly once.

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{Map, Value};

use tensorforge_billing::{identity::AuthUser, sanitize_value, Schema};
use tensorforge_types::BillingError;

use crate::state::AppState;

/// Error response wrapper: status from the error taxonomy, body
/// `{"error": "<message>"}` with internals already scrubbed.
#[derive(Debug)]
pub struct ApiError(pub BillingError);

impl ApiError {
    pub fn status_code(&self) -> u16 {
        self.0.http_status_code()
    }

    pub fn message(&self) -> String {
        self.0.client_message()
    }
}

impl<E: Into<BillingError>> From<E> for ApiError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.0);
        }
        (status, Json(serde_json::json!({"error": self.0.client_message()}))).into_response()
    }
}

/// What a handler receives once the pipeline admits a request.
pub struct RequestContext {
    pub user: AuthUser,
    /// Allow-listed, sanitized, schema-validated body fields.
    pub data: Map<String, Value>,
}

/// Run the shared stages for one request.
///
/// `endpoint` namespaces the rate-limit key so each endpoint class gets its
/// own window per identity.
pub async fn run(
    state: &AppState,
    endpoint: &'static str,
    headers: &HeaderMap,
    body: &str,
    schema: &Schema,
) -> Result<RequestContext, ApiError> {
    let inner = &state.inner;

    // AuthChecked: the resolver makes one auth-provider call at most; its
    // user doubles as the preferred rate-limit identity below.
    let identity = inner.identity.resolve(headers).await;
    let Some(user) = identity.user else {
        return Err(BillingError::Unauthorized.into());
    };

    // RateLimited
    let key = format!("{}:{}", endpoint, identity.rate_limit_key);
    let decision = inner.rate_limiter.admit(
        &key,
        inner.config.rate_limit_requests,
        inner.config.rate_limit_window(),
    );
    if !decision.allowed {
        return Err(BillingError::RateLimited {
            retry_after_secs: decision.retry_after_secs.unwrap_or(1),
        }
        .into());
    }

    // Parsed
    let parsed: Value = serde_json::from_str(body).map_err(|_| BillingError::MalformedBody)?;

    // Sanitized, then Validated against the endpoint schema
    let data = schema.validate(&sanitize_value(parsed)).map_err(BillingError::from)?;

    Ok(RequestContext { user, data })
}

/// Deserialize validated fields into the endpoint's typed request.
///
/// The schema has already enforced shape, so a failure here is a programming
/// error (schema and struct out of sync), not client input.
pub fn decode<T: serde::de::DeserializeOwned>(data: Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(data)).map_err(|e| {
        BillingError::Internal { message: format!("validated body failed to decode: {}", e) }.into()
    })
}
