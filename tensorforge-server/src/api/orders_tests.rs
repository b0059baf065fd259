use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Json;

use super::orders::create_order;
use crate::test_helpers::{auth_headers, mount_customer_mock, mount_order_mock, test_app_state};

#[tokio::test]
async fn test_create_order_happy_path() {
    let (state, _store, server) = test_app_state().await;
    mount_customer_mock(&server).await;
    mount_order_mock(&server, 79_900).await;

    let body = r#"{"plan_key":"data_pro","billing_interval":"monthly"}"#;
    let Json(response) =
        create_order(State(state), auth_headers(), body.to_string()).await.unwrap();

    assert_eq!(response.order_id, "order_test1");
    assert_eq!(response.amount, 79_900);
    assert_eq!(response.currency, "INR");
    assert_eq!(response.key_id, "rzp_test_k1");
    assert_eq!(response.customer_id, "cust_test1");
}

#[tokio::test]
async fn test_create_order_requires_auth() {
    let (state, _store, _server) = test_app_state().await;

    let body = r#"{"plan_key":"data_pro","billing_interval":"monthly"}"#;
    let err = create_order(State(state), HeaderMap::new(), body.to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 401);
    assert_eq!(err.message(), "Unauthorized");
}

#[tokio::test]
async fn test_create_order_rejects_unknown_plan() {
    let (state, _store, _server) = test_app_state().await;

    let body = r#"{"plan_key":"mega_pro","billing_interval":"monthly"}"#;
    let err = create_order(State(state), auth_headers(), body.to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.message().starts_with("plan_key must be one of"));
}

#[tokio::test]
async fn test_create_order_free_plan_not_purchasable() {
    let (state, _store, _server) = test_app_state().await;

    let body = r#"{"plan_key":"free","billing_interval":"monthly"}"#;
    let err = create_order(State(state), auth_headers(), body.to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(err.message().contains("free"));
}

#[tokio::test]
async fn test_create_order_malformed_json() {
    let (state, _store, _server) = test_app_state().await;

    let err = create_order(State(state), auth_headers(), "{not json".to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(err.message(), "Invalid JSON body");
}

#[tokio::test]
async fn test_create_order_coupon_format_enforced() {
    let (state, _store, _server) = test_app_state().await;

    let body =
        r#"{"plan_key":"data_pro","billing_interval":"monthly","coupon_code":"not a coupon!"}"#;
    let err = create_order(State(state), auth_headers(), body.to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(err.message(), "coupon_code has an invalid format");
}

#[tokio::test]
async fn test_eleventh_request_in_window_is_rejected() {
    let (state, _store, server) = test_app_state().await;
    mount_customer_mock(&server).await;
    mount_order_mock(&server, 79_900).await;

    let body = r#"{"plan_key":"data_pro","billing_interval":"monthly"}"#;
    for _ in 0..10 {
        create_order(State(state.clone()), auth_headers(), body.to_string())
            .await
            .expect("within the window budget");
    }

    let err = create_order(State(state), auth_headers(), body.to_string())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 429);
    // The message embeds a positive retry-after seconds hint
    let digits: String = err.message().chars().filter(char::is_ascii_digit).collect();
    let secs: u64 = digits.parse().expect("message contains seconds");
    assert!(secs >= 1 && secs <= 60);
}
