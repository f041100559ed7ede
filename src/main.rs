// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Quantboard API Server
//!
//! Serves the analytics dashboard: Google sign-in with signed session cookies,
//! admin management, user preferences, and proxying to the backtest engine.

use quantboard::{
    config::Config,
    db::JsonStore,
    services::{AdminRegistry, BacktestClient, GoogleIdentityVerifier, UserProfileStore},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Quantboard API");

    // Storage: fallback-chain JSON documents
    let store = JsonStore::new(&config);
    let admins = AdminRegistry::new(store.clone(), config.bootstrap_admins.clone());
    let users = UserProfileStore::new(store);

    // Seed bootstrap admins eagerly so a fresh deployment starts usable
    match admins.bootstrap_and_read().await {
        Ok(list) => tracing::info!(count = list.len(), "Admin registry ready"),
        Err(e) => tracing::warn!(error = %e, "Admin registry bootstrap failed"),
    }

    let identity = Arc::new(
        GoogleIdentityVerifier::new(config.google_client_id.clone())
            .expect("Failed to initialize identity verifier"),
    );

    let backtest =
        BacktestClient::new(config.backend_url.clone()).expect("Failed to initialize backtest client");
    tracing::info!(backend = %config.backend_url, "Backtest engine client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        admins,
        users,
        identity,
        backtest,
    });

    // Build router
    let app = quantboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quantboard=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
