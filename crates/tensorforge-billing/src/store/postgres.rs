//! Postgres-backed store.
//!
//! Plan keys, intervals, and statuses are stored as their snake_case wire
//! strings; rows that fail to map back are surfaced as store errors rather
//! than panics, since the table may outlive any one binary version.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use tensorforge_types::{
    BillingError, BillingInterval, PlanKey, Subscription, SubscriptionStatus,
};

use super::{BillingStore, PaymentRecord};

/// Store implementation over a sqlx Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to Postgres and apply pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

/// Convert a PostgreSQL row to a Subscription struct.
fn row_to_subscription(row: &PgRow) -> Result<Subscription, BillingError> {
    let plan_str: String = row.get("plan_key");
    let plan_key = PlanKey::parse(&plan_str)
        .ok_or_else(|| store_err(format!("unknown plan_key in row: {}", plan_str)))?;

    let interval_str: String = row.get("billing_interval");
    let billing_interval = BillingInterval::parse(&interval_str)
        .ok_or_else(|| store_err(format!("unknown billing_interval in row: {}", interval_str)))?;

    let status_str: String = row.get("status");
    let status = parse_status(&status_str)
        .ok_or_else(|| store_err(format!("unknown status in row: {}", status_str)))?;

    Ok(Subscription {
        id: row.get("id"),
        user_id: row.get("user_id"),
        plan_key,
        billing_interval,
        status,
        current_period_start: row.get("current_period_start"),
        current_period_end: row.get("current_period_end"),
        provider_subscription_id: row.get("provider_subscription_id"),
        created_at: row.get("created_at"),
    })
}

fn parse_status(s: &str) -> Option<SubscriptionStatus> {
    [
        SubscriptionStatus::Active,
        SubscriptionStatus::Trialing,
        SubscriptionStatus::PastDue,
        SubscriptionStatus::Canceled,
        SubscriptionStatus::Unpaid,
        SubscriptionStatus::Paused,
    ]
    .into_iter()
    .find(|v| v.as_str() == s)
}

fn store_err(message: String) -> BillingError {
    BillingError::Store { message }
}

fn db_err(e: sqlx::Error) -> BillingError {
    tracing::error!("database error: {}", e);
    BillingError::Store { message: e.to_string() }
}

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, plan_key, billing_interval, status, \
     current_period_start, current_period_end, provider_subscription_id, created_at";

#[async_trait]
impl BillingStore for PgStore {
    async fn subscription_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<Subscription>, BillingError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT 1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(row_to_subscription).transpose()
    }

    async fn subscription_by_id(&self, id: Uuid) -> Result<Option<Subscription>, BillingError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(row_to_subscription).transpose()
    }

    async fn upsert_subscription(&self, subscription: &Subscription) -> Result<(), BillingError> {
        sqlx::query(
            "INSERT INTO subscriptions \
             (id, user_id, plan_key, billing_interval, status, \
              current_period_start, current_period_end, provider_subscription_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (id) DO UPDATE SET \
               plan_key = EXCLUDED.plan_key, \
               billing_interval = EXCLUDED.billing_interval, \
               status = EXCLUDED.status, \
               current_period_start = EXCLUDED.current_period_start, \
               current_period_end = EXCLUDED.current_period_end, \
               provider_subscription_id = EXCLUDED.provider_subscription_id",
        )
        .bind(subscription.id)
        .bind(&subscription.user_id)
        .bind(subscription.plan_key.as_str())
        .bind(subscription.billing_interval.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.current_period_start)
        .bind(subscription.current_period_end)
        .bind(&subscription.provider_subscription_id)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn record_payment(&self, payment: &PaymentRecord) -> Result<(), BillingError> {
        sqlx::query(
            "INSERT INTO payments \
             (id, user_id, order_id, payment_id, plan_key, billing_interval, \
              amount, currency, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (payment_id) DO NOTHING",
        )
        .bind(payment.id)
        .bind(&payment.user_id)
        .bind(&payment.order_id)
        .bind(&payment.payment_id)
        .bind(payment.plan_key.as_str())
        .bind(payment.billing_interval.as_str())
        .bind(payment.amount)
        .bind(&payment.currency)
        .bind(payment.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}
