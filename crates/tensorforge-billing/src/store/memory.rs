//! In-memory store for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use tensorforge_types::{BillingError, Subscription};

use super::{BillingStore, PaymentRecord};

/// HashMap-backed [`BillingStore`]; state dies with the process.
#[derive(Default)]
pub struct MemoryStore {
    subscriptions: RwLock<HashMap<Uuid, Subscription>>,
    payments: RwLock<Vec<PaymentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded payments, for assertions.
    pub async fn payments(&self) -> Vec<PaymentRecord> {
        self.payments.read().await.clone()
    }
}

#[async_trait]
impl BillingStore for MemoryStore {
    async fn subscription_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<Subscription>, BillingError> {
        let subs = self.subscriptions.read().await;
        Ok(subs
            .values()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    async fn subscription_by_id(&self, id: Uuid) -> Result<Option<Subscription>, BillingError> {
        Ok(self.subscriptions.read().await.get(&id).cloned())
    }

    async fn upsert_subscription(&self, subscription: &Subscription) -> Result<(), BillingError> {
        self.subscriptions.write().await.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn record_payment(&self, payment: &PaymentRecord) -> Result<(), BillingError> {
        let mut payments = self.payments.write().await;
        // payment_id is the idempotency key
        if !payments.iter().any(|p| p.payment_id == payment.payment_id) {
            payments.push(payment.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tensorforge_types::{BillingInterval, PlanKey};

    #[tokio::test]
    async fn test_latest_subscription_wins() {
        let store = MemoryStore::new();
        let older =
            Subscription::start_now("user-1", PlanKey::Free, BillingInterval::Monthly, 0, None);
        let mut newer =
            Subscription::start_now("user-1", PlanKey::DataPro, BillingInterval::Monthly, 0, None);
        newer.created_at = older.created_at + chrono::Duration::seconds(5);

        store.upsert_subscription(&older).await.unwrap();
        store.upsert_subscription(&newer).await.unwrap();

        let found = store.subscription_for_user("user-1").await.unwrap().unwrap();
        assert_eq!(found.plan_key, PlanKey::DataPro);
    }

    #[tokio::test]
    async fn test_duplicate_payments_are_dropped() {
        let store = MemoryStore::new();
        let payment = PaymentRecord {
            id: Uuid::new_v4(),
            user_id: "user-1".to_string(),
            order_id: "order_1".to_string(),
            payment_id: "pay_1".to_string(),
            plan_key: PlanKey::DataPro,
            billing_interval: BillingInterval::Monthly,
            amount: 79_900,
            currency: "INR".to_string(),
            created_at: Utc::now(),
        };

        store.record_payment(&payment).await.unwrap();
        store.record_payment(&payment).await.unwrap();
        assert_eq!(store.payments().await.len(), 1);
    }
}
