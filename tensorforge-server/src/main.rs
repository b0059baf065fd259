//! Tensorforge Billing Server - Headless Daemon
//!
//! A pure Rust HTTP server that:
//! - Exposes the billing API (orders, payment verification, subscriptions) on /api/billing/*
//! - Wraps Razorpay for payments and Supabase Auth for identity
//! - Persists subscriptions and payments in Postgres
//!
//! Access via: http://localhost:8070

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod cli;
mod router;
mod state;

#[cfg(test)]
mod test_helpers;

use cli::Cli;
use state::AppState;
use tensorforge_billing::{BillingConfig, PgStore, RazorpayClient, SupabaseAuth};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    info!("🚀 Tensorforge billing server starting on port {}...", cli.port);

    let config = BillingConfig::from_env().context("failed to load configuration")?;

    let store = Arc::new(
        PgStore::connect(&config.database_url)
            .await
            .context("failed to connect to Postgres")?,
    );

    let http = reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .context("failed to build HTTP client")?;

    let auth = Arc::new(SupabaseAuth::new(
        http.clone(),
        &config.supabase_url,
        &config.supabase_service_key,
    ));
    let gateway = RazorpayClient::new(http, &config.razorpay_key_id, &config.razorpay_key_secret);

    let state = AppState::new(config, auth, gateway, store);
    let app = router::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await.context("failed to bind")?;

    info!("🌐 Server listening on http://{}", addr);
    info!("💳 Billing API at http://localhost:{}/api/billing/", cli.port);

    axum::serve(listener, app).await?;

    Ok(())
}
