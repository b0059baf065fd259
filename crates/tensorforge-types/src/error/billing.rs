//! Billing-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ValidationError;

/// Errors that can occur while handling a billing request.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BillingError {
    /// Missing or invalid bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Too many requests in the current window
    #[error("Too many requests. Please try again in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Request body failed schema validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Request body was not valid JSON
    #[error("Invalid JSON body")]
    MalformedBody,

    /// Payment callback signature did not match the computed HMAC
    #[error("Invalid payment signature")]
    InvalidSignature,

    /// Plan key not present in the catalog
    #[error("Unknown plan: {plan}")]
    PlanNotFound { plan: String },

    /// Operation not valid for the plan (e.g. ordering the free tier)
    #[error("Plan {plan} cannot be purchased")]
    PlanNotPurchasable { plan: String },

    /// Referenced subscription does not exist or belongs to another user
    #[error("Subscription not found: {id}")]
    SubscriptionNotFound { id: String },

    /// Subscription is not in a state that allows the operation
    #[error("Subscription {id} is not active")]
    SubscriptionInactive { id: String },

    /// Payment provider call failed (network error, 5xx, rejected request)
    #[error("Payment gateway error: {message}")]
    Gateway { message: String },

    /// Persistence layer failure
    #[error("Store error: {message}")]
    Store { message: String },

    /// Internal error (bugs, unexpected states)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BillingError {
    /// Check if this is a client error (4xx equivalent).
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            Self::Gateway { .. } | Self::Store { .. } | Self::Internal { .. }
        )
    }

    /// Get HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Unauthorized => 401,
            Self::RateLimited { .. } => 429,
            Self::Validation(_)
            | Self::MalformedBody
            | Self::InvalidSignature
            | Self::PlanNotFound { .. }
            | Self::PlanNotPurchasable { .. }
            | Self::SubscriptionNotFound { .. }
            | Self::SubscriptionInactive { .. } => 400,
            Self::Gateway { .. } | Self::Store { .. } | Self::Internal { .. } => 500,
        }
    }

    /// Message safe to echo to the client.
    ///
    /// Client errors surface their Display form verbatim; infrastructure
    /// errors collapse to a generic message (raw detail is logged server-side
    /// only).
    pub fn client_message(&self) -> String {
        match self {
            Self::Gateway { .. } => "Payment provider error".to_string(),
            Self::Store { .. } | Self::Internal { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}
