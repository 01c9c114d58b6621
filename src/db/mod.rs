// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer (local key-value file).

pub mod local_store;

pub use local_store::LocalStore;

/// Key names as constants.
pub mod keys {
    /// Last access token that was exchanged or verified.
    pub const ACCESS_TOKEN: &str = "strava_access_token";
}
