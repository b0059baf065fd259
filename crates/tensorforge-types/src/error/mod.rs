//! Typed error definitions for the Tensorforge billing service.
//!
//! This module provides a structured error hierarchy with specific error types
//! for different domains. All errors are designed to be:
//!
//! - **Serializable** for API responses via serde
//! - **Displayable** for logging via Display trait
//! - **Matchable** for error handling logic via enum variants
//! - **Composable** via thiserror derive macros

mod billing;
mod config;
mod validation;

pub use billing::BillingError;
pub use config::ConfigError;
pub use validation::ValidationError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
///
/// Use this when you need a single error type that can represent
/// any billing-service error.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[serde(tag = "domain", content = "error")]
pub enum TypedError {
    /// Wraps a billing operation error
    #[error("Billing error: {0}")]
    Billing(#[from] BillingError),

    /// Wraps a configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Standard Result type using TypedError.
pub type Result<T> = std::result::Result<T, TypedError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = TypedError::Billing(BillingError::PlanNotFound { plan: "ultra_pro".to_string() });

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("Billing"));
        assert!(json.contains("ultra_pro"));

        let deserialized: TypedError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = BillingError::RateLimited { retry_after_secs: 42 };

        let msg = format!("{}", err);
        assert!(msg.contains("42"));
    }
}
