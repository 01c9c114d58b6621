// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::photo::{Photo, Photos};

/// Activity as returned by the list and detail endpoints.
///
/// Only the fields the dashboard uses are decoded; anything else Strava
/// sends is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    pub name: String,
    /// Legacy activity type (Ride, Run, Hike, etc.)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Finer-grained sport type, when Strava provides it
    #[serde(default)]
    pub sport_type: Option<String>,
    /// Start date/time (UTC)
    pub start_date: DateTime<Utc>,
    /// Free-text description (detail endpoint only)
    #[serde(default)]
    pub description: Option<String>,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: u64,
    /// Elapsed time in seconds
    #[serde(default)]
    pub elapsed_time: Option<u64>,
    /// Elevation gain in meters
    pub total_elevation_gain: f64,
    /// Average speed in m/s
    pub average_speed: f64,
    /// Max speed in m/s
    pub max_speed: f64,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub max_heartrate: Option<f64>,
    /// Kilocalories (detail endpoint only)
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub kudos_count: Option<u32>,
    /// Whether a heart-rate stream exists for this activity
    #[serde(default)]
    pub has_heartrate: bool,
    #[serde(default)]
    pub total_photo_count: u32,
    /// Photo block (detail endpoint)
    #[serde(default)]
    pub photos: Option<Photos>,
    /// Legacy single photo field
    #[serde(default)]
    pub primary_photo: Option<Photo>,
}
