//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading startup configuration.
///
/// All of these are startup-time failures. A missing payment-provider key or
/// database URL aborts the daemon; it is never surfaced per-request.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("Missing required environment variable: {name}")]
    MissingVar {
        /// Name of the missing variable
        name: String,
    },

    /// Environment variable is set but could not be parsed
    #[error("Invalid value for {name}: {message}")]
    InvalidVar {
        /// Name of the offending variable
        name: String,
        /// Description of the parse failure
        message: String,
    },
}

impl ConfigError {
    /// Create a `MissingVar` error for the given variable name.
    pub fn missing(name: &str) -> Self {
        Self::MissingVar { name: name.to_string() }
    }
}
