// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client.
//!
//! Handles:
//! - Authorization code exchange
//! - Athlete stats (doubles as the token liveness check)
//! - Activity listing and detail
//! - Heart-rate streams
//!
//! Every call is a single request: no retries, no caching.

use crate::error::AppError;
use crate::models::{Activity, AthleteStats, StreamSet};
use serde::{Deserialize, Serialize};

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(
        api_url: impl Into<String>,
        oauth_url: impl Into<String>,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            oauth_url: oauth_url.into().trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        }
    }

    /// Consent-screen URL for the authorization-code flow.
    pub fn authorize_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/authorize?\
             client_id={}&\
             response_type=code&\
             redirect_uri={}&\
             approval_prompt=force&\
             scope=read,activity:read_all&\
             state={}",
            self.oauth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state)
        )
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<TokenExchangeResponse, AppError> {
        let body = TokenExchangeRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            code,
            grant_type: "authorization_code",
            redirect_uri,
        };

        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Strava token exchange failed");
            return Err(AppError::AuthorizationFailed(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::AuthorizationFailed(format!("Failed to parse token response: {}", e)))
    }

    /// Whether the stats endpoint accepts `access_token`.
    ///
    /// Any non-success status means "not valid"; only transport failures
    /// are errors.
    pub async fn stats_accessible(
        &self,
        access_token: &str,
        athlete_id: u64,
    ) -> Result<bool, AppError> {
        let url = format!("{}/athletes/{}/stats", self.api_url, athlete_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::info!(status = %status, "Strava rejected stored token");
        }
        Ok(status.is_success())
    }

    /// Get aggregate stats for an athlete.
    pub async fn get_athlete_stats(
        &self,
        access_token: &str,
        athlete_id: u64,
    ) -> Result<AthleteStats, AppError> {
        let url = format!("{}/athletes/{}/stats", self.api_url, athlete_id);
        self.get_json(&url, access_token, &[]).await
    }

    /// List the authenticated athlete's most recent activities.
    pub async fn list_activities(
        &self,
        access_token: &str,
        per_page: u32,
    ) -> Result<Vec<Activity>, AppError> {
        let url = format!("{}/athlete/activities", self.api_url);
        self.get_json(&url, access_token, &[("per_page", per_page.to_string())])
            .await
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<Activity, AppError> {
        let url = format!("{}/activities/{}", self.api_url, activity_id);
        self.get_json(&url, access_token, &[]).await
    }

    /// Get the heart-rate stream of an activity, keyed by type.
    pub async fn get_heartrate_stream(
        &self,
        access_token: &str,
        activity_id: u64,
    ) -> Result<StreamSet, AppError> {
        let url = format!("{}/activities/{}/streams", self.api_url, activity_id);
        self.get_json(
            &url,
            access_token,
            &[
                ("keys", "heartrate".to_string()),
                ("key_by_type", "true".to_string()),
            ],
        )
        .await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            return Err(match status.as_u16() {
                401 => AppError::InvalidToken,
                404 => AppError::NotFound(body),
                429 => {
                    tracing::warn!("Strava rate limit hit (429)");
                    AppError::RateLimited
                }
                _ => AppError::StravaApi(format!("HTTP {}: {}", status, body)),
            });
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

/// Body of `POST /oauth/token`.
#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
    grant_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<&'a str>,
}

/// Token exchange response from Strava OAuth.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenExchangeResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub athlete: Option<TokenAthlete>,
}

/// Athlete summary included in the exchange response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenAthlete {
    pub id: u64,
    #[serde(default)]
    pub firstname: Option<String>,
}
