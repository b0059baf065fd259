//! Subscription records as persisted by the store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BillingInterval, PlanKey};

/// Lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
    Unpaid,
    Paused,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Trialing => "trialing",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Paused => "paused",
        }
    }

    /// States in which the user currently has paid entitlements and a plan
    /// change is meaningful.
    pub fn allows_plan_change(&self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }
}

/// One user's subscription to a plan.
///
/// Invariant: `current_period_start < current_period_end`. Constructors here
/// uphold it; rows read back from the store are trusted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: String,
    pub plan_key: PlanKey,
    pub billing_interval: BillingInterval,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    /// Identifier assigned by the payment provider, absent for free tiers.
    pub provider_subscription_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Create a subscription whose first period starts now.
    ///
    /// A trial shifts the period end out by `trial_days` on top of the
    /// interval length and starts the record in `Trialing`.
    pub fn start_now(
        user_id: &str,
        plan_key: PlanKey,
        billing_interval: BillingInterval,
        trial_days: u32,
        provider_subscription_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        let period = Duration::days(billing_interval.nominal_days())
            + Duration::days(i64::from(trial_days));
        let status = if trial_days > 0 {
            SubscriptionStatus::Trialing
        } else {
            SubscriptionStatus::Active
        };

        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            plan_key,
            billing_interval,
            status,
            current_period_start: now,
            current_period_end: now + period,
            provider_subscription_id,
            created_at: now,
        }
    }

    /// Whole days in the current period, never below 1.
    pub fn period_days(&self) -> i64 {
        (self.current_period_end - self.current_period_start)
            .num_days()
            .max(1)
    }
}
