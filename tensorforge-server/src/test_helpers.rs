//! Test helpers for tensorforge-server unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tensorforge_billing::identity::{AuthError, AuthProvider, AuthUser};
use tensorforge_billing::{BillingConfig, MemoryStore, RazorpayClient};

use crate::state::AppState;

pub const TEST_TOKEN: &str = "valid-session-token";
pub const TEST_USER_ID: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";

/// Accepts exactly [`TEST_TOKEN`]; no network.
struct StaticAuth;

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn user_from_token(&self, token: &str) -> Result<AuthUser, AuthError> {
        if token == TEST_TOKEN {
            Ok(AuthUser { id: TEST_USER_ID.to_string(), email: Some("dev@example.com".to_string()) })
        } else {
            Err(AuthError::Rejected)
        }
    }
}

fn test_config(gateway_secret: &str) -> BillingConfig {
    let pairs = [
        ("RAZORPAY_KEY_ID", "rzp_test_k1"),
        ("RAZORPAY_KEY_SECRET", gateway_secret),
        ("DATABASE_URL", "postgres://localhost/tensorforge_test"),
        ("SUPABASE_URL", "https://test.supabase.co"),
        ("SUPABASE_SERVICE_ROLE_KEY", "service-key"),
    ];
    BillingConfig::from_lookup(|name| {
        pairs.iter().find(|(n, _)| *n == name).map(|(_, v)| v.to_string())
    })
    .expect("test config is complete")
}

/// Minimal `AppState` for handler tests.
///
/// Returns the in-memory store for assertions and the mock payment provider —
/// keep the `MockServer` alive for the test duration.
pub async fn test_app_state() -> (AppState, Arc<MemoryStore>, MockServer) {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryStore::new());
    let config = test_config("secret_s1");
    let gateway = RazorpayClient::with_base_url(
        reqwest::Client::new(),
        &server.uri(),
        &config.razorpay_key_id,
        &config.razorpay_key_secret,
    );

    let state = AppState::new(config, Arc::new(StaticAuth), gateway, store.clone());
    (state, store, server)
}

pub fn auth_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::AUTHORIZATION,
        format!("Bearer {}", TEST_TOKEN).parse().expect("valid header"),
    );
    headers
}

/// Stub `POST /v1/customers`.
pub async fn mount_customer_mock(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "cust_test1",
            "email": "dev@example.com",
        })))
        .mount(server)
        .await;
}

/// Stub `POST /v1/orders`, echoing the requested amount.
pub async fn mount_order_mock(server: &MockServer, amount: i64) {
    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "order_test1",
            "amount": amount,
            "currency": "INR",
            "receipt": "tf_test",
            "status": "created",
        })))
        .mount(server)
        .await;
}

/// Stub `POST /v1/subscriptions`.
pub async fn mount_subscription_mock(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/subscriptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "sub_test1",
            "plan_id": "plan_tf_data_pro_monthly",
            "status": "created",
        })))
        .mount(server)
        .await;
}
