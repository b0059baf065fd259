//! Subscription and payment persistence.
//!
//! Storage sits behind [`BillingStore`] so handlers never talk to a pool
//! directly: production uses [`PgStore`], tests use [`MemoryStore`].

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use tensorforge_types::{BillingError, BillingInterval, PlanKey, Subscription};

/// A captured payment, persisted once its signature verified.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub user_id: String,
    pub order_id: String,
    pub payment_id: String,
    pub plan_key: PlanKey,
    pub billing_interval: BillingInterval,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Persistence operations the handlers need.
#[async_trait]
pub trait BillingStore: Send + Sync {
    /// Most recent subscription for a user, if any.
    async fn subscription_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<Subscription>, BillingError>;

    async fn subscription_by_id(&self, id: Uuid) -> Result<Option<Subscription>, BillingError>;

    /// Insert or fully replace a subscription row.
    async fn upsert_subscription(&self, subscription: &Subscription) -> Result<(), BillingError>;

    async fn record_payment(&self, payment: &PaymentRecord) -> Result<(), BillingError>;
}
