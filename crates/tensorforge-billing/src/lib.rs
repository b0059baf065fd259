//! # Tensorforge Billing
//!
//! Core business logic for the Tensorforge billing service.
//!
//! The request-handling pipeline every endpoint runs through:
//!
//! ```text
//! tensorforge-billing/src/
//! ├── identity.rs    # rate-limit key from bearer token or client IP
//! ├── rate_limit.rs  # fixed-window admission per key
//! ├── sanitize.rs    # recursive string cleaning of JSON bodies
//! ├── schema.rs      # declarative field validation
//! ├── signature.rs   # HMAC-SHA256 payment callback verification
//! ├── proration.rs   # mid-cycle plan-change arithmetic
//! ├── gateway/       # Razorpay REST client
//! ├── store/         # subscription/payment persistence
//! └── middleware/    # CORS layer
//! ```
//!
//! Handlers live in `tensorforge-server`; this crate has no routing.

pub mod config;
pub mod gateway;
pub mod identity;
pub mod middleware;
pub mod proration;
pub mod rate_limit;
pub mod sanitize;
pub mod schema;
pub mod signature;
pub mod store;

pub use config::BillingConfig;
pub use gateway::RazorpayClient;
pub use identity::{AuthProvider, IdentityResolver, SupabaseAuth};
pub use rate_limit::{RateLimitDecision, RateLimiter};
pub use sanitize::sanitize_value;
pub use schema::{FieldRule, FieldType, Schema};
pub use signature::verify_payment_signature;
pub use store::{BillingStore, MemoryStore, PaymentRecord, PgStore};
