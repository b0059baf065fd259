//! # Tensorforge Types
//!
//! Core types, models, and error definitions for the Tensorforge billing
//! service.
//!
//! This crate provides the foundational type system for the billing backend:
//!
//! - **`error`** - Typed error hierarchy for billing, validation, and configuration
//! - **`models`** - Domain models (Plan, Subscription, Proration)
//!
//! ## Architecture Role
//!
//! `tensorforge-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        tensorforge-types (this crate)
//!                 │
//!                 ▼
//!        tensorforge-billing
//!                 │
//!                 ▼
//!        tensorforge-server
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde for API responses
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{BillingError, ConfigError, Result, TypedError, ValidationError};

// Re-export core model types
pub use models::{
    BillingInterval, PlanKey, ProrationBreakdown, Subscription, SubscriptionStatus,
};
