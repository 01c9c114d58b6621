// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token lifecycle.
//!
//! The dashboard keeps exactly one token. It comes from an authorization
//! code exchange, from the local store, or from a pre-seeded value, in that
//! order. Expiry is not tracked locally: a token is good until the stats
//! endpoint says otherwise.

use crate::db::{keys, LocalStore};
use crate::error::AppError;
use crate::models::AthleteStats;
use crate::services::strava::StravaClient;

/// Resolves, verifies and persists the access token.
#[derive(Clone)]
pub struct TokenManager {
    client: StravaClient,
    store: LocalStore,
    athlete_id: u64,
    initial_token: Option<String>,
}

impl TokenManager {
    pub fn new(
        client: StravaClient,
        store: LocalStore,
        athlete_id: u64,
        initial_token: Option<String>,
    ) -> Self {
        Self {
            client,
            store,
            athlete_id,
            initial_token,
        }
    }

    /// Resolve the token to use.
    ///
    /// With a `code`, exchange it and persist the new token. Without one,
    /// return the stored token or the pre-seeded one, unverified.
    pub async fn resolve_token(
        &self,
        code: Option<&str>,
        redirect_uri: Option<&str>,
    ) -> Result<Option<String>, AppError> {
        match code {
            Some(code) => self.exchange(code, redirect_uri).await.map(Some),
            None => Ok(self.stored_token().await),
        }
    }

    /// Stored token, else the pre-seeded one.
    pub async fn stored_token(&self) -> Option<String> {
        match self.store.get(keys::ACCESS_TOKEN).await {
            Some(token) => Some(token),
            None => self.initial_token.clone(),
        }
    }

    /// Exchange an authorization code and persist the resulting token.
    pub async fn exchange(
        &self,
        code: &str,
        redirect_uri: Option<&str>,
    ) -> Result<String, AppError> {
        tracing::info!("Exchanging authorization code for tokens");
        let response = self.client.exchange_code(code, redirect_uri).await?;

        if response.access_token.is_empty() {
            return Err(AppError::AuthorizationFailed(
                "Token response had no access token".to_string(),
            ));
        }

        self.store
            .set(keys::ACCESS_TOKEN, &response.access_token)
            .await?;

        tracing::info!(
            athlete_id = response.athlete.as_ref().map(|a| a.id),
            "Authorization code exchanged, token stored"
        );
        Ok(response.access_token)
    }

    /// Check the token against the stats endpoint.
    ///
    /// `Ok(false)` means the provider refused it (expired or revoked). The
    /// stored value is left alone in that case. An accepted token is
    /// written back to the store.
    pub async fn verify(&self, token: &str) -> Result<bool, AppError> {
        let accepted = self.client.stats_accessible(token, self.athlete_id).await?;
        if accepted {
            self.store.set(keys::ACCESS_TOKEN, token).await?;
        }
        Ok(accepted)
    }

    /// Aggregate stats for the configured athlete.
    pub async fn fetch_stats(&self, token: &str) -> Result<AthleteStats, AppError> {
        self.client.get_athlete_stats(token, self.athlete_id).await
    }

    /// Consent-screen URL for a callback address and signed state.
    pub fn authorization_url(&self, callback_url: &str, state: &str) -> String {
        self.client.authorize_url(callback_url, state)
    }

    /// Forget the stored token (logout).
    pub async fn forget(&self) -> Result<(), AppError> {
        if self.store.remove(keys::ACCESS_TOKEN).await?.is_some() {
            tracing::info!("Stored access token removed");
        }
        Ok(())
    }
}
