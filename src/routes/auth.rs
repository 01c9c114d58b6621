// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava OAuth authentication routes.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Redirect,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::Result;
use crate::models::ConnectionStatus;
use crate::services::oauth_state::{sign_state, verify_state};
use crate::services::PageLoad;
use crate::AppState;

const CALLBACK_PATH: &str = "/auth/strava/callback";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/strava", get(auth_start))
        .route(CALLBACK_PATH, get(auth_callback))
        .route("/auth/logout", get(logout))
}

/// Query parameters for starting OAuth flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to return to after the callback.
    /// If not provided, uses FRONTEND_URL.
    #[serde(default)]
    return_to: Option<String>,
}

/// Callback address on this service, rebuilt from the request `Host`.
pub fn callback_url(headers: &HeaderMap, fallback_host: &str) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or(fallback_host);

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}{}", scheme, host, CALLBACK_PATH)
}

/// Start OAuth flow - redirect to Strava authorization.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let return_to = params
        .return_to
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let oauth_state = sign_state(&state.config.oauth_state_key, &return_to, chrono::Utc::now())?;
    let callback = callback_url(&headers, &state.config.api_host);
    let auth_url = state
        .dashboard
        .tokens()
        .authorization_url(&callback, &oauth_state);

    tracing::info!(
        client_id = %state.config.strava_client_id,
        return_to = %return_to,
        callback = %callback,
        "Starting OAuth flow, redirecting to Strava"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code, then send the browser back to the
/// frontend with the code gone from the URL.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let verified = params
        .state
        .as_deref()
        .ok_or_else(|| "missing state".to_string())
        .and_then(|s| {
            verify_state(&state.config.oauth_state_key, s, chrono::Utc::now())
                .map_err(|e| e.to_string())
        });

    // An unverified callback never touches the session.
    let frontend_url = match verified {
        Ok(return_to) => return_to,
        Err(reason) => {
            tracing::warn!(reason = %reason, "Invalid OAuth state parameter");
            return Redirect::temporary(&with_error(&state.config.frontend_url, "invalid_state"));
        }
    };

    // Strava sends `error` instead of `code` when consent is denied.
    let error = match (&params.code, params.error) {
        (_, Some(error)) => Some(error),
        (None, None) => Some("missing_code".to_string()),
        (Some(_), None) => None,
    };
    let page = PageLoad {
        code: params.code,
        error,
        redirect_uri: Some(callback_url(&headers, &state.config.api_host)),
    };
    let error = page.error.clone();

    let status = state.dashboard.load(page).await;
    tracing::info!(?status, "OAuth callback handled");

    let redirect = match (status, error) {
        (ConnectionStatus::Success, _) => frontend_url,
        (_, Some(error)) => with_error(&frontend_url, &error),
        _ => with_error(&frontend_url, "authorization_failed"),
    };
    Redirect::temporary(&redirect)
}

/// Append `error=<code>` to a frontend URL that may already carry a query.
fn with_error(frontend_url: &str, error: &str) -> String {
    let sep = if frontend_url.contains('?') { '&' } else { '?' };
    format!("{}{}error={}", frontend_url, sep, urlencoding::encode(error))
}

/// Logout - forget the stored token.
async fn logout(State(state): State<Arc<AppState>>) -> Redirect {
    if let Err(e) = state.dashboard.disconnect().await {
        tracing::warn!(error = %e, "Failed to forget stored token");
    }
    Redirect::temporary(&state.config.frontend_url)
}
