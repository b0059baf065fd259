//! Subscription lifecycle: creation and mid-cycle plan changes.

use std::sync::LazyLock;

use axum::{extract::State, http::HeaderMap, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tensorforge_billing::{proration, FieldRule, Schema};
use tensorforge_types::{
    BillingError, BillingInterval, PlanKey, Subscription, SubscriptionStatus,
};

use super::pipeline::{self, ApiError};
use super::{INTERVALS, PLAN_KEYS, UUID_PATTERN};
use crate::state::AppState;

static CREATE_SUBSCRIPTION_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("plan_key", FieldRule::string().required().one_of(PLAN_KEYS))
        .field("billing_interval", FieldRule::string().required().one_of(INTERVALS))
        .field("trial_days", FieldRule::number().min(0.0).max(365.0))
});

static CHANGE_PLAN_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("subscription_id", FieldRule::string().required().pattern(UUID_PATTERN))
        .field("new_plan_key", FieldRule::string().required().one_of(PLAN_KEYS))
});

#[derive(Deserialize)]
struct CreateSubscriptionRequest {
    plan_key: PlanKey,
    billing_interval: BillingInterval,
    trial_days: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreateSubscriptionResponse {
    pub subscription_id: Uuid,
    pub provider_subscription_id: String,
    pub status: SubscriptionStatus,
}

pub async fn create_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<CreateSubscriptionResponse>, ApiError> {
    let ctx = pipeline::run(
        &state,
        "create-subscription",
        &headers,
        &body,
        &CREATE_SUBSCRIPTION_SCHEMA,
    )
    .await?;
    let req: CreateSubscriptionRequest = pipeline::decode(ctx.data)?;

    if !req.plan_key.is_purchasable() {
        return Err(BillingError::PlanNotPurchasable {
            plan: req.plan_key.as_str().to_string(),
        }
        .into());
    }

    let trial_days = req.trial_days.unwrap_or(0.0) as u32;
    // One provider subscription covers a year of cycles
    let total_count = match req.billing_interval {
        BillingInterval::Monthly => 12,
        BillingInterval::Yearly => 1,
    };

    let inner = &state.inner;
    let provider_sub = inner
        .gateway
        .create_subscription(
            &req.plan_key.provider_plan_id(req.billing_interval),
            total_count,
            trial_days,
            serde_json::json!({"user_id": ctx.user.id}),
        )
        .await?;

    let subscription = Subscription::start_now(
        &ctx.user.id,
        req.plan_key,
        req.billing_interval,
        trial_days,
        Some(provider_sub.id.clone()),
    );
    inner.store.upsert_subscription(&subscription).await?;

    tracing::info!(
        "created subscription {} ({}) for user {}",
        subscription.id,
        provider_sub.id,
        ctx.user.id
    );

    Ok(Json(CreateSubscriptionResponse {
        subscription_id: subscription.id,
        provider_subscription_id: provider_sub.id,
        status: subscription.status,
    }))
}

/// What happens to the subscription as a result of the plan change.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanChangeAction {
    /// Upgrade: the prorated difference is charged immediately.
    ChargeNow,
    /// Downgrade (or zero-cost change): takes effect at period end; any
    /// leftover credit is a product decision, not an automatic refund.
    Deferred,
}

#[derive(Deserialize)]
struct ChangePlanRequest {
    subscription_id: String,
    new_plan_key: PlanKey,
}

#[derive(Debug, Serialize)]
pub struct ChangePlanResponse {
    pub subscription_id: Uuid,
    pub action: PlanChangeAction,
    /// Order to settle when the change is charged now.
    pub order_id: Option<String>,
    #[serde(flatten)]
    pub breakdown: tensorforge_types::ProrationBreakdown,
}

pub async fn change_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<ChangePlanResponse>, ApiError> {
    let ctx = pipeline::run(&state, "change-plan", &headers, &body, &CHANGE_PLAN_SCHEMA).await?;
    let req: ChangePlanRequest = pipeline::decode(ctx.data)?;

    let id = Uuid::parse_str(&req.subscription_id).map_err(|e| BillingError::Internal {
        message: format!("uuid passed pattern but failed to parse: {}", e),
    })?;

    let inner = &state.inner;
    let subscription = inner
        .store
        .subscription_by_id(id)
        .await?
        // A foreign subscription id reads the same as an unknown one
        .filter(|s| s.user_id == ctx.user.id)
        .ok_or_else(|| BillingError::SubscriptionNotFound { id: req.subscription_id.clone() })?;

    if !subscription.status.allows_plan_change() {
        return Err(BillingError::SubscriptionInactive {
            id: req.subscription_id.clone(),
        }
        .into());
    }

    let breakdown = proration::for_plan_change(&subscription, req.new_plan_key, Utc::now())?;

    let (action, order_id) = if breakdown.is_upgrade && breakdown.prorated_amount > 0 {
        let receipt = format!("tf_change_{}", Uuid::new_v4().simple());
        let notes = serde_json::json!({
            "user_id": ctx.user.id,
            "subscription_id": subscription.id,
            "new_plan_key": req.new_plan_key.as_str(),
        });
        let order = inner
            .gateway
            .create_order(breakdown.prorated_amount, "INR", &receipt, notes)
            .await?;
        (PlanChangeAction::ChargeNow, Some(order.id))
    } else {
        (PlanChangeAction::Deferred, None)
    };

    tracing::info!(
        "plan change for subscription {}: {} -> {} ({:?})",
        subscription.id,
        subscription.plan_key,
        req.new_plan_key,
        action
    );

    Ok(Json(ChangePlanResponse {
        subscription_id: subscription.id,
        action,
        order_id,
        breakdown,
    }))
}
