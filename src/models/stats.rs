// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Athlete aggregate statistics from `GET /athletes/{id}/stats`.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Totals for one sport over one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityTotal {
    #[serde(default)]
    pub count: u32,
    /// Meters
    #[serde(default)]
    pub distance: f64,
    /// Seconds
    #[serde(default)]
    pub moving_time: u64,
    /// Seconds
    #[serde(default)]
    pub elapsed_time: u64,
    /// Meters
    #[serde(default)]
    pub elevation_gain: f64,
}

/// Aggregate stats for the dashboard's athlete.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AthleteStats {
    // ─── Records ─────────────────────────────────────────────────
    #[serde(default)]
    pub biggest_ride_distance: Option<f64>,
    #[serde(default)]
    pub biggest_climb_elevation_gain: Option<f64>,

    // ─── Last four weeks ─────────────────────────────────────────
    #[serde(default)]
    pub recent_ride_totals: ActivityTotal,
    #[serde(default)]
    pub recent_run_totals: ActivityTotal,
    #[serde(default)]
    pub recent_swim_totals: ActivityTotal,

    // ─── Year to date ────────────────────────────────────────────
    #[serde(default)]
    pub ytd_ride_totals: ActivityTotal,
    #[serde(default)]
    pub ytd_run_totals: ActivityTotal,
    #[serde(default)]
    pub ytd_swim_totals: ActivityTotal,

    // ─── All time ────────────────────────────────────────────────
    #[serde(default)]
    pub all_ride_totals: ActivityTotal,
    #[serde(default)]
    pub all_run_totals: ActivityTotal,
    #[serde(default)]
    pub all_swim_totals: ActivityTotal,
}
