// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Athlete Dashboard: a personal Strava activity dashboard
//!
//! This crate provides the backend for a single-athlete dashboard: it runs
//! the Strava OAuth flow, keeps the access token in a local store, and
//! serves normalized activities, photos and heart-rate data as JSON.

pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::LocalStore;
use services::{ActivityService, DashboardService, StravaClient, TokenManager};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub dashboard: DashboardService,
}

impl AppState {
    /// Wire the services for `config` on top of `store`.
    pub fn new(config: Config, store: LocalStore) -> Self {
        let client = StravaClient::new(
            config.strava_api_url.clone(),
            config.strava_oauth_url.clone(),
            config.strava_client_id.clone(),
            config.strava_client_secret.clone(),
        );
        let tokens = TokenManager::new(
            client.clone(),
            store,
            config.strava_athlete_id,
            config.strava_initial_token.clone(),
        );
        let dashboard = DashboardService::new(tokens, ActivityService::new(client));

        Self { config, dashboard }
    }
}
