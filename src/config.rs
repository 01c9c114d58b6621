// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;

/// Default number of activities shown on the dashboard.
pub const DEFAULT_ACTIVITY_LIMIT: u32 = 10;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Strava application ---
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Athlete whose stats endpoint doubles as the token liveness check
    pub strava_athlete_id: u64,
    /// Pre-seeded access token used when nothing is stored yet
    pub strava_initial_token: Option<String>,
    /// Strava REST API base URL
    pub strava_api_url: String,
    /// Strava OAuth base URL (authorize + token endpoints live below it)
    pub strava_oauth_url: String,

    // --- Service ---
    /// Frontend URL the OAuth callback redirects back to
    pub frontend_url: String,
    /// Host used to rebuild the callback address when the request has none
    pub api_host: String,
    /// Key used to sign the OAuth `state` parameter
    pub oauth_state_key: Vec<u8>,
    /// JSON file backing the local key-value store
    pub token_store_path: PathBuf,
    /// Activities fetched when the caller gives no limit
    pub activity_limit: u32,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let strava_athlete_id = env::var("STRAVA_ATHLETE_ID")
            .map_err(|_| ConfigError::Missing("STRAVA_ATHLETE_ID"))?
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("STRAVA_ATHLETE_ID"))?;

        let activity_limit = match env::var("ACTIVITY_LIMIT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("ACTIVITY_LIMIT"))?,
            Err(_) => DEFAULT_ACTIVITY_LIMIT,
        };

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            strava_athlete_id,
            strava_initial_token: env::var("STRAVA_INITIAL_TOKEN")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            strava_api_url: env::var("STRAVA_API_URL")
                .unwrap_or_else(|_| "https://www.strava.com/api/v3".to_string()),
            strava_oauth_url: env::var("STRAVA_OAUTH_URL")
                .unwrap_or_else(|_| "https://www.strava.com/oauth".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string()),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
            token_store_path: env::var("TOKEN_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/local_storage.json")),
            activity_limit,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }

    /// Config for tests: dummy credentials, in-tree store path.
    pub fn test_default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_athlete_id: 49665406,
            strava_initial_token: None,
            strava_api_url: "http://127.0.0.1:9/api/v3".to_string(),
            strava_oauth_url: "http://127.0.0.1:9/oauth".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            api_host: "localhost:8080".to_string(),
            oauth_state_key: b"test_state_key_32_bytes_minimum!".to_vec(),
            token_store_path: PathBuf::from("data/test_local_storage.json"),
            activity_limit: DEFAULT_ACTIVITY_LIMIT,
            port: 8080,
        }
    }

    /// Point both Strava base URLs at another host (fake provider in tests).
    pub fn with_strava_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.strava_api_url = format!("{}/api/v3", base);
        self.strava_oauth_url = format!("{}/oauth", base);
        self
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
