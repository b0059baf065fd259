//! Schema validation errors.
//!
//! Each variant names the offending field in its Display form — the message
//! is echoed verbatim to the client as the body of a 400 response, so it must
//! be self-describing without leaking anything beyond the field name and the
//! declared constraint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First validation failure encountered for a request body.
///
/// Fields are checked in schema declaration order and validation stops at the
/// first failure, so a multi-error input always reports the same message.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ValidationError {
    /// Request body was not a JSON object
    #[error("Request body must be a JSON object")]
    NotAnObject,

    /// Required field absent, null, or an empty string
    #[error("{field} is required")]
    MissingField { field: String },

    /// Value's JSON type does not match the declared type
    #[error("{field} must be a {expected}")]
    WrongType { field: String, expected: String },

    /// String shorter than the declared minimum length
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// String longer than the declared maximum length
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Number below the declared minimum
    #[error("{field} must be >= {min}")]
    BelowMinimum { field: String, min: f64 },

    /// Number above the declared maximum
    #[error("{field} must be <= {max}")]
    AboveMaximum { field: String, max: f64 },

    /// String does not match the declared anchored pattern
    #[error("{field} has an invalid format")]
    PatternMismatch { field: String },

    /// String not a member of the declared enum
    #[error("{field} must be one of: {allowed}")]
    NotInEnum { field: String, allowed: String },
}

impl ValidationError {
    /// The name of the field that failed, if the failure is field-scoped.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotAnObject => None,
            Self::MissingField { field }
            | Self::WrongType { field, .. }
            | Self::TooShort { field, .. }
            | Self::TooLong { field, .. }
            | Self::BelowMinimum { field, .. }
            | Self::AboveMaximum { field, .. }
            | Self::PatternMismatch { field }
            | Self::NotInEnum { field, .. } => Some(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = ValidationError::MissingField { field: "plan_key".to_string() };
        assert_eq!(err.to_string(), "plan_key is required");
        assert_eq!(err.field(), Some("plan_key"));

        let err = ValidationError::NotInEnum {
            field: "billing_interval".to_string(),
            allowed: "monthly, yearly".to_string(),
        };
        assert!(err.to_string().contains("billing_interval"));
        assert!(err.to_string().contains("monthly"));
    }
}
