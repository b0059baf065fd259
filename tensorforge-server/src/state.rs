//! Application State
//!
//! Holds the shared components every billing handler uses: startup config,
//! the rate limiter, identity resolution, the payment gateway, and the store.

use std::sync::Arc;

use tensorforge_billing::{
    store::BillingStore, AuthProvider, BillingConfig, IdentityResolver, RateLimiter,
    RazorpayClient,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub(crate) inner: Arc<AppStateInner>,
}

pub struct AppStateInner {
    pub config: BillingConfig,
    pub rate_limiter: RateLimiter,
    pub identity: IdentityResolver,
    pub gateway: RazorpayClient,
    pub store: Arc<dyn BillingStore>,
}

impl AppState {
    pub fn new(
        config: BillingConfig,
        auth: Arc<dyn AuthProvider>,
        gateway: RazorpayClient,
        store: Arc<dyn BillingStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                rate_limiter: RateLimiter::new(),
                identity: IdentityResolver::new(auth),
                gateway,
                store,
            }),
        }
    }
}
