//! Payment completion verification.

use std::sync::LazyLock;

use axum::{extract::State, http::HeaderMap, response::Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tensorforge_billing::{
    store::PaymentRecord, verify_payment_signature, FieldRule, Schema,
};
use tensorforge_types::{
    BillingError, BillingInterval, PlanKey, Subscription, SubscriptionStatus,
};

use super::pipeline::{self, ApiError};
use super::{INTERVALS, PLAN_KEYS};
use crate::state::AppState;

static VERIFY_PAYMENT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("razorpay_order_id", FieldRule::string().required().min(1.0).max(100.0))
        .field("razorpay_payment_id", FieldRule::string().required().min(1.0).max(100.0))
        .field("razorpay_signature", FieldRule::string().required().min(1.0).max(200.0))
        .field("plan_key", FieldRule::string().required().one_of(PLAN_KEYS))
        .field("billing_interval", FieldRule::string().required().one_of(INTERVALS))
});

#[derive(Deserialize)]
struct VerifyPaymentRequest {
    razorpay_order_id: String,
    razorpay_payment_id: String,
    razorpay_signature: String,
    plan_key: PlanKey,
    billing_interval: BillingInterval,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub verified: bool,
    pub subscription_id: Uuid,
    pub status: SubscriptionStatus,
}

/// Confirm a checkout completion reported by the client.
///
/// The redirect/webhook payload is attacker-controlled until the signature
/// check passes; nothing is persisted before it.
pub async fn verify_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<VerifyPaymentResponse>, ApiError> {
    let ctx =
        pipeline::run(&state, "verify-payment", &headers, &body, &VERIFY_PAYMENT_SCHEMA).await?;
    let req: VerifyPaymentRequest = pipeline::decode(ctx.data)?;

    let inner = &state.inner;
    if !verify_payment_signature(
        &req.razorpay_order_id,
        &req.razorpay_payment_id,
        &req.razorpay_signature,
        &inner.config.razorpay_key_secret,
    ) {
        tracing::warn!(
            "signature mismatch for order {} from user {}",
            req.razorpay_order_id,
            ctx.user.id
        );
        return Err(BillingError::InvalidSignature.into());
    }

    let amount = req
        .plan_key
        .price_paise(req.billing_interval)
        .ok_or_else(|| BillingError::PlanNotPurchasable {
            plan: req.plan_key.as_str().to_string(),
        })?;

    let subscription = Subscription::start_now(
        &ctx.user.id,
        req.plan_key,
        req.billing_interval,
        0,
        None,
    );

    inner
        .store
        .record_payment(&PaymentRecord {
            id: Uuid::new_v4(),
            user_id: ctx.user.id.clone(),
            order_id: req.razorpay_order_id,
            payment_id: req.razorpay_payment_id,
            plan_key: req.plan_key,
            billing_interval: req.billing_interval,
            amount,
            currency: "INR".to_string(),
            created_at: Utc::now(),
        })
        .await?;
    inner.store.upsert_subscription(&subscription).await?;

    tracing::info!(
        "payment verified for user {}: {} {} now {}",
        ctx.user.id,
        req.plan_key,
        req.billing_interval,
        subscription.status.as_str()
    );

    Ok(Json(VerifyPaymentResponse {
        verified: true,
        subscription_id: subscription.id,
        status: subscription.status,
    }))
}
