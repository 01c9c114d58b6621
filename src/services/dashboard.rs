// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard controller.
//!
//! Owns the [`Session`] and runs the connect flow:
//! - callback with `error` → consent denied, session fails
//! - callback with `code` → exchange, store, connected
//! - no code → stored (or pre-seeded) token, verified against stats
//!
//! Activity and stats calls go through here so a rejected token demotes
//! the session back to pending.

use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{Activity, AthleteStats, ConnectionStatus, Session, SessionEvent};
use crate::services::activity::{ActivityDetail, ActivityService};
use crate::services::token::TokenManager;

/// Query of a page load: what the OAuth redirect put in the URL.
#[derive(Debug, Clone, Default)]
pub struct PageLoad {
    pub code: Option<String>,
    pub error: Option<String>,
    /// Callback address the code was issued for.
    pub redirect_uri: Option<String>,
}

/// Read-only copy of the session for display.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub status: ConnectionStatus,
    pub last_error: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Single owner of connection state and the active token.
pub struct DashboardService {
    tokens: TokenManager,
    activities: ActivityService,
    session: RwLock<Session>,
}

impl DashboardService {
    pub fn new(tokens: TokenManager, activities: ActivityService) -> Self {
        Self {
            tokens,
            activities,
            session: RwLock::new(Session::default()),
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.read().await;
        SessionSnapshot {
            status: session.status(),
            last_error: session.last_error().map(str::to_string),
            updated_at: session.updated_at(),
        }
    }

    pub async fn status(&self) -> ConnectionStatus {
        self.session.read().await.status()
    }

    async fn apply(&self, event: SessionEvent) -> ConnectionStatus {
        self.session.write().await.apply(event)
    }

    /// Run the connect flow for one page load.
    pub async fn load(&self, page: PageLoad) -> ConnectionStatus {
        if let Some(error) = page.error {
            tracing::warn!(error = %error, "Authorization was not granted");
            return self
                .apply(SessionEvent::Failed(format!("authorization denied: {}", error)))
                .await;
        }

        let has_code = page.code.is_some();
        if !has_code && self.tokens.stored_token().await.is_none() {
            tracing::info!("No stored token, waiting for authorization");
            return self.status().await;
        }

        self.apply(SessionEvent::Connect).await;

        let token = match self
            .tokens
            .resolve_token(page.code.as_deref(), page.redirect_uri.as_deref())
            .await
        {
            Ok(Some(token)) => token,
            Ok(None) => return self.apply(SessionEvent::TokenRejected).await,
            Err(e) => {
                tracing::error!(error = %e, "Token exchange failed");
                return self.apply(SessionEvent::Failed(e.to_string())).await;
            }
        };

        // A freshly exchanged token is trusted; a stored one is checked.
        if has_code {
            return self.apply(SessionEvent::Authorized(token)).await;
        }

        match self.tokens.verify(&token).await {
            Ok(true) => self.apply(SessionEvent::Authorized(token)).await,
            Ok(false) => self.apply(SessionEvent::TokenRejected).await,
            Err(e) => {
                tracing::error!(error = %e, "Token verification failed");
                self.apply(SessionEvent::Failed(e.to_string())).await
            }
        }
    }

    /// Log out: forget the stored token and return to pending.
    pub async fn disconnect(&self) -> Result<ConnectionStatus> {
        self.tokens.forget().await?;
        Ok(self.apply(SessionEvent::TokenRejected).await)
    }

    /// Token of the active session.
    async fn active_token(&self) -> Result<String> {
        self.session
            .read()
            .await
            .token()
            .map(str::to_string)
            .ok_or(AppError::Unauthorized)
    }

    /// Demote the session when the provider rejects the token.
    async fn observe<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if e.is_token_rejection() {
                tracing::info!("Token rejected during API call, reauthorization needed");
                self.apply(SessionEvent::TokenRejected).await;
            }
        }
        result
    }

    pub async fn stats(&self) -> Result<AthleteStats> {
        let token = self.active_token().await?;
        self.observe(self.tokens.fetch_stats(&token).await).await
    }

    pub async fn recent_activities(&self, limit: u32) -> Result<Vec<Activity>> {
        let token = self.active_token().await?;
        self.observe(self.activities.list_activities(&token, limit).await)
            .await
    }

    pub async fn open_activity(&self, activity_id: u64) -> Result<ActivityDetail> {
        let token = self.active_token().await?;
        self.observe(self.activities.open_activity(&token, activity_id).await)
            .await
    }
}
