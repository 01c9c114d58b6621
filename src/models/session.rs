// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard connection state.
//!
//! The session is the single owner of the connection status and the token
//! currently in use. It only changes through [`Session::apply`].

use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Connection status shown by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No usable token; manual authorization is offered.
    Pending,
    /// Exchanging a code or verifying a token.
    Connecting,
    /// A verified token is active.
    Success,
    /// Consent denied, exchange failed or the provider was unreachable.
    Error,
}

/// Inputs to the session state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A code exchange or token verification started.
    Connect,
    /// The provider accepted this token.
    Authorized(String),
    /// The provider rejected the token in use.
    TokenRejected,
    /// Terminal failure with a reason for the logs.
    Failed(String),
}

/// Connection state owned by the dashboard.
#[derive(Debug, Clone)]
pub struct Session {
    status: ConnectionStatus,
    token: Option<String>,
    last_error: Option<String>,
    updated_at: DateTime<Utc>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            status: ConnectionStatus::Pending,
            token: None,
            last_error: None,
            updated_at: Utc::now(),
        }
    }
}

impl Session {
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Token usable for API calls; only set while connected.
    pub fn token(&self) -> Option<&str> {
        match self.status {
            ConnectionStatus::Success => self.token.as_deref(),
            _ => None,
        }
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply an event and return the resulting status.
    ///
    /// Events that make no sense in the current state are logged and
    /// ignored.
    pub fn apply(&mut self, event: SessionEvent) -> ConnectionStatus {
        use ConnectionStatus::*;

        let next = match (self.status, event) {
            (Pending | Success | Error, SessionEvent::Connect) => {
                self.token = None;
                Connecting
            }
            (Connecting, SessionEvent::Authorized(token)) => {
                self.token = Some(token);
                self.last_error = None;
                Success
            }
            (Connecting | Success, SessionEvent::TokenRejected) => {
                self.token = None;
                Pending
            }
            (_, SessionEvent::Failed(reason)) => {
                self.token = None;
                self.last_error = Some(reason);
                Error
            }
            (status, event) => {
                tracing::warn!(?status, ?event, "Ignoring session event");
                return status;
            }
        };

        tracing::debug!(from = ?self.status, to = ?next, "Session transition");
        self.status = next;
        self.updated_at = Utc::now();
        next
    }
}
