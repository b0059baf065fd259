use axum::extract::State;
use axum::response::Json;
use chrono::{Duration, Utc};
use uuid::Uuid;

use tensorforge_billing::store::BillingStore;
use tensorforge_types::{
    BillingInterval, PlanKey, Subscription, SubscriptionStatus,
};

use super::subscriptions::{change_plan, create_subscription, PlanChangeAction};
use crate::test_helpers::{
    auth_headers, mount_order_mock, mount_subscription_mock, test_app_state, TEST_USER_ID,
};

#[tokio::test]
async fn test_create_subscription_with_trial() {
    let (state, store, server) = test_app_state().await;
    mount_subscription_mock(&server).await;

    let body = r#"{"plan_key":"data_pro","billing_interval":"monthly","trial_days":14}"#;
    let Json(response) =
        create_subscription(State(state), auth_headers(), body.to_string()).await.unwrap();

    assert_eq!(response.provider_subscription_id, "sub_test1");
    assert_eq!(response.status, SubscriptionStatus::Trialing);

    let stored = store
        .subscription_for_user(TEST_USER_ID)
        .await
        .unwrap()
        .expect("subscription persisted");
    assert_eq!(stored.id, response.subscription_id);
    assert_eq!(stored.provider_subscription_id.as_deref(), Some("sub_test1"));
}

#[tokio::test]
async fn test_create_subscription_enterprise_goes_through_sales() {
    let (state, _store, _server) = test_app_state().await;

    let body = r#"{"plan_key":"enterprise","billing_interval":"yearly"}"#;
    let err = create_subscription(State(state), auth_headers(), body.to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.message().contains("enterprise"));
}

#[tokio::test]
async fn test_create_subscription_trial_days_out_of_range() {
    let (state, _store, _server) = test_app_state().await;

    let body = r#"{"plan_key":"data_pro","billing_interval":"monthly","trial_days":366}"#;
    let err = create_subscription(State(state), auth_headers(), body.to_string())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "trial_days must be <= 365");
}

/// Subscription 15 days into a 30-day period, owned by the test user.
///
/// The extra hour keeps `days_remaining` at 15 even though the handler reads
/// the clock a moment after this runs (whole-day math truncates).
fn mid_period_subscription(plan: PlanKey) -> Subscription {
    let now = Utc::now();
    Subscription {
        id: Uuid::new_v4(),
        user_id: TEST_USER_ID.to_string(),
        plan_key: plan,
        billing_interval: BillingInterval::Monthly,
        status: SubscriptionStatus::Active,
        current_period_start: now - Duration::days(15) - Duration::hours(1),
        current_period_end: now + Duration::days(15) + Duration::hours(1),
        provider_subscription_id: Some("sub_seed".to_string()),
        created_at: now - Duration::days(15),
    }
}

fn change_body(id: Uuid, new_plan: &str) -> String {
    serde_json::json!({"subscription_id": id, "new_plan_key": new_plan}).to_string()
}

#[tokio::test]
async fn test_change_plan_upgrade_charges_now() {
    let (state, store, server) = test_app_state().await;
    let sub = mid_period_subscription(PlanKey::DataPro);
    store.upsert_subscription(&sub).await.unwrap();

    // half of data_pro unused: 39_950; train_pro costs 149_900
    let expected_charge = 149_900 - 39_950;
    mount_order_mock(&server, expected_charge).await;

    let Json(response) =
        change_plan(State(state), auth_headers(), change_body(sub.id, "train_pro"))
            .await
            .unwrap();

    assert_eq!(response.action, PlanChangeAction::ChargeNow);
    assert_eq!(response.order_id.as_deref(), Some("order_test1"));
    assert!(response.breakdown.is_upgrade);
    assert_eq!(response.breakdown.days_remaining, 15);
    assert_eq!(response.breakdown.unused_amount, 39_950);
    assert_eq!(response.breakdown.prorated_amount, expected_charge);
}

#[tokio::test]
async fn test_change_plan_downgrade_is_deferred() {
    let (state, store, _server) = test_app_state().await;
    let sub = mid_period_subscription(PlanKey::DeployPro);
    store.upsert_subscription(&sub).await.unwrap();

    let Json(response) =
        change_plan(State(state), auth_headers(), change_body(sub.id, "data_pro"))
            .await
            .unwrap();

    assert_eq!(response.action, PlanChangeAction::Deferred);
    assert!(response.order_id.is_none());
    assert!(!response.breakdown.is_upgrade);
    // deploy_pro half-unused credit exceeds the data_pro price
    assert!(response.breakdown.is_credit());
    assert_eq!(response.breakdown.prorated_amount, 0);
}

#[tokio::test]
async fn test_change_plan_foreign_subscription_reads_as_unknown() {
    let (state, store, _server) = test_app_state().await;
    let mut sub = mid_period_subscription(PlanKey::DataPro);
    sub.user_id = "someone-else".to_string();
    store.upsert_subscription(&sub).await.unwrap();

    let err = change_plan(State(state), auth_headers(), change_body(sub.id, "train_pro"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.message().contains("not found"));
}

#[tokio::test]
async fn test_change_plan_inactive_subscription_rejected() {
    let (state, store, _server) = test_app_state().await;
    let mut sub = mid_period_subscription(PlanKey::DataPro);
    sub.status = SubscriptionStatus::Canceled;
    store.upsert_subscription(&sub).await.unwrap();

    let err = change_plan(State(state), auth_headers(), change_body(sub.id, "train_pro"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.message().contains("not active"));
}

#[tokio::test]
async fn test_change_plan_rejects_malformed_id() {
    let (state, _store, _server) = test_app_state().await;

    let body =
        serde_json::json!({"subscription_id": "not-a-uuid", "new_plan_key": "train_pro"})
            .to_string();
    let err = change_plan(State(state), auth_headers(), body).await.unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(err.message(), "subscription_id has an invalid format");
}
