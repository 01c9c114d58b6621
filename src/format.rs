// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Display formatting for activity metrics.

use chrono::{DateTime, Utc};

/// Placeholder for a metric with no meaningful value.
pub const MISSING: &str = "--";

/// `1h 2m 5s`, or `2m 5s` under an hour.
pub fn format_duration(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{}h {}m {}s", h, m, s)
    } else {
        format!("{}m {}s", m, s)
    }
}

fn is_ride(activity_type: &str) -> bool {
    matches!(activity_type, "Ride" | "VirtualRide")
}

/// Speed as shown on the dashboard: km/h for rides, min:sec per km otherwise.
pub fn format_pace(speed_ms: f64, activity_type: &str) -> String {
    if !speed_ms.is_finite() || speed_ms <= 0.0 {
        return MISSING.to_string();
    }
    if is_ride(activity_type) {
        return format!("{:.1}", speed_ms * 3.6);
    }

    let pace_min_per_km = 1000.0 / (speed_ms * 60.0);
    let mut mins = pace_min_per_km.floor() as u64;
    let mut secs = ((pace_min_per_km - mins as f64) * 60.0).round() as u64;
    if secs == 60 {
        mins += 1;
        secs = 0;
    }
    format!("{}:{:02}", mins, secs)
}

/// Unit label matching [`format_pace`].
pub fn pace_unit(activity_type: &str) -> &'static str {
    if is_ride(activity_type) {
        "km/h"
    } else {
        "/km"
    }
}

/// Meters as kilometres with two decimals.
pub fn format_distance_km(meters: f64) -> String {
    format!("{:.2}", meters / 1000.0)
}

/// m/s as km/h with one decimal.
pub fn format_speed_kmh(speed_ms: f64) -> String {
    format!("{:.1}", speed_ms * 3.6)
}

/// Whole-number metric, or the placeholder when absent.
pub fn format_optional_whole(value: Option<f64>) -> String {
    value
        .filter(|v| v.is_finite())
        .map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| MISSING.to_string())
}

/// Display label for an activity type.
pub fn sport_label(activity_type: &str) -> String {
    let label = match activity_type {
        "Run" => "CORRIDA",
        "Ride" => "CICLISMO",
        "VirtualRide" => "PEDAL VIRTUAL",
        "Walk" => "CAMINHADA",
        "Swim" => "NATAÇÃO",
        "WeightTraining" => "MUSCULAÇÃO",
        "Workout" => "TREINO",
        "Yoga" => "YOGA",
        "Hike" => "TRILHA",
        other => return other.to_uppercase(),
    };
    label.to_string()
}

/// `05 MAR 2025`
pub fn format_start_date(date: DateTime<Utc>) -> String {
    date.format("%d %b %Y").to_string().to_uppercase()
}

/// Public Strava page for an activity.
pub fn activity_link(activity_id: u64) -> String {
    format!("https://www.strava.com/activities/{}", activity_id)
}
