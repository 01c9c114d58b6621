// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod dashboard;
pub mod oauth_state;
pub mod strava;
pub mod token;

pub use activity::{ActivityDetail, ActivityService};
pub use dashboard::{DashboardService, PageLoad, SessionSnapshot};
pub use strava::StravaClient;
pub use token::TokenManager;
