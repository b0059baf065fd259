//! API Routes
//!
//! One module per billing endpoint; `pipeline` holds the shared
//! auth/rate-limit/parse/sanitize/validate stages.

mod orders;
mod payments;
mod pipeline;
mod subscriptions;

#[cfg(test)]
mod orders_tests;
#[cfg(test)]
mod subscriptions_tests;

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};

use crate::state::AppState;

/// Recognized plan keys, shared by every endpoint schema.
pub(crate) const PLAN_KEYS: &[&str] =
    &["free", "data_pro", "train_pro", "deploy_pro", "enterprise"];

pub(crate) const INTERVALS: &[&str] = &["monthly", "yearly"];

/// UUID v4, case-insensitive.
pub(crate) const UUID_PATTERN: &str =
    r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

/// Coupon codes as issued by marketing: upper-case alphanumerics, `_`, `-`.
pub(crate) const COUPON_PATTERN: &str = r"(?i)[A-Z0-9_-]+";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/billing/create-order", post(orders::create_order))
        .route("/billing/verify-payment", post(payments::verify_payment))
        .route(
            "/billing/create-subscription",
            post(subscriptions::create_subscription),
        )
        .route("/billing/change-plan", post(subscriptions::change_plan))
        // API fallback: return 404 for unknown API endpoints
        .fallback(api_not_found)
}

async fn api_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": "Not found"})))
}
