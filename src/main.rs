// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete Dashboard API Server
//!
//! Connects to Strava on startup with the stored token, then serves the
//! dashboard API and the OAuth routes.

use athlete_dashboard::{config::Config, db::LocalStore, services::PageLoad, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Athlete Dashboard API");

    // Open the local token store
    let store = LocalStore::open(&config.token_store_path).await?;

    let state = Arc::new(AppState::new(config.clone(), store));

    // Reuse the stored token if Strava still accepts it
    let status = state.dashboard.load(PageLoad::default()).await;
    tracing::info!(?status, "Initial Strava connection resolved");

    // Build router
    let app = athlete_dashboard::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("athlete_dashboard=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
