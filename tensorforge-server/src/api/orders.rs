//! Checkout order creation.

use std::sync::LazyLock;

use axum::{extract::State, http::HeaderMap, response::Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tensorforge_billing::{FieldRule, Schema};
use tensorforge_types::{BillingError, BillingInterval, PlanKey};

use super::pipeline::{self, ApiError};
use super::{COUPON_PATTERN, INTERVALS, PLAN_KEYS};
use crate::state::AppState;

static CREATE_ORDER_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::new()
        .field("plan_key", FieldRule::string().required().one_of(PLAN_KEYS))
        .field("billing_interval", FieldRule::string().required().one_of(INTERVALS))
        .field("coupon_code", FieldRule::string().min(3.0).max(50.0).pattern(COUPON_PATTERN))
});

#[derive(Deserialize)]
struct CreateOrderRequest {
    plan_key: PlanKey,
    billing_interval: BillingInterval,
    coupon_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Minor currency units (INR paise).
    pub amount: i64,
    pub currency: String,
    /// Public key id the checkout widget opens with.
    pub key_id: String,
    pub customer_id: String,
}

pub async fn create_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let ctx = pipeline::run(&state, "create-order", &headers, &body, &CREATE_ORDER_SCHEMA).await?;
    let req: CreateOrderRequest = pipeline::decode(ctx.data)?;

    let amount = req
        .plan_key
        .price_paise(req.billing_interval)
        .ok_or_else(|| BillingError::PlanNotPurchasable {
            plan: req.plan_key.as_str().to_string(),
        })?;

    let inner = &state.inner;
    let email = ctx
        .user
        .email
        .clone()
        .unwrap_or_else(|| format!("{}@customers.tensorforge.app", ctx.user.id));
    let customer = inner.gateway.create_customer(&email, None).await?;

    let receipt = format!("tf_{}", Uuid::new_v4().simple());
    let notes = serde_json::json!({
        "user_id": ctx.user.id,
        "plan_key": req.plan_key.as_str(),
        "billing_interval": req.billing_interval.as_str(),
        "coupon_code": req.coupon_code,
    });
    let order = inner.gateway.create_order(amount, "INR", &receipt, notes).await?;

    tracing::info!(
        "created order {} for user {} ({} {})",
        order.id,
        ctx.user.id,
        req.plan_key,
        req.billing_interval
    );

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        amount: order.amount,
        currency: order.currency,
        key_id: inner.gateway.key_id().to_string(),
        customer_id: customer.id,
    }))
}
