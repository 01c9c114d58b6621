// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard API routes.
//!
//! Everything except `/api/status` and `/api/connect` needs a connected
//! session and answers 401 otherwise.

use crate::error::Result;
use crate::format;
use crate::models::{extract_photo_url, Activity, AthleteStats, ConnectionStatus, HeartRateSeries};
use crate::services::{ActivityDetail, PageLoad, SessionSnapshot};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/status", get(get_status))
        .route("/api/connect", post(connect))
        .route("/api/stats", get(get_stats))
        .route("/api/activities", get(get_activities))
        .route("/api/activities/{id}", get(get_activity))
}

// ─── Connection ──────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatusResponse {
    pub status: ConnectionStatus,
    pub last_error: Option<String>,
    pub updated_at: String,
}

impl From<SessionSnapshot> for StatusResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            status: snapshot.status,
            last_error: snapshot.last_error,
            updated_at: snapshot
                .updated_at
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        }
    }
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(state.dashboard.snapshot().await.into())
}

/// Retry with the stored token, as a page reload would.
async fn connect(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    state.dashboard.load(PageLoad::default()).await;
    Json(state.dashboard.snapshot().await.into())
}

// ─── Stats ───────────────────────────────────────────────────

async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<AthleteStats>> {
    Ok(Json(state.dashboard.stats().await?))
}

// ─── Activities ──────────────────────────────────────────────

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Number of activities; defaults to ACTIVITY_LIMIT.
    limit: Option<u32>,
}

/// Activity as shown in the list.
#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityCard {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    pub name: String,
    pub activity_type: String,
    pub sport_type: Option<String>,
    pub label: String,
    pub start_date: String,
    pub date_label: String,
    pub distance_km: String,
    pub duration: String,
    pub pace: String,
    pub pace_unit: String,
    pub elevation_gain_m: String,
    pub average_heartrate: Option<String>,
    pub photo_url: Option<String>,
}

impl From<&Activity> for ActivityCard {
    fn from(act: &Activity) -> Self {
        // Pace and label follow the legacy `type`; MountainBikeRide and
        // friends still report `type: "Ride"`.
        let kind = act.activity_type.as_str();
        Self {
            id: act.id,
            name: act.name.clone(),
            activity_type: kind.to_string(),
            sport_type: act.sport_type.clone().filter(|s| !s.is_empty()),
            label: format::sport_label(kind),
            start_date: act
                .start_date
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            date_label: format::format_start_date(act.start_date),
            distance_km: format::format_distance_km(act.distance),
            duration: format::format_duration(act.moving_time),
            pace: format::format_pace(act.average_speed, kind),
            pace_unit: format::pace_unit(kind).to_string(),
            elevation_gain_m: format::format_optional_whole(Some(act.total_elevation_gain)),
            average_heartrate: act
                .average_heartrate
                .map(|hr| format::format_optional_whole(Some(hr))),
            photo_url: extract_photo_url(act).map(str::to_string),
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    pub activities: Vec<ActivityCard>,
    pub limit: u32,
}

async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    let limit = params.limit.unwrap_or(state.config.activity_limit);
    let activities = state.dashboard.recent_activities(limit).await?;

    Ok(Json(ActivitiesResponse {
        activities: activities.iter().map(ActivityCard::from).collect(),
        limit,
    }))
}

/// Selected activity with its gallery and heart-rate chart data.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityDetailResponse {
    #[serde(flatten)]
    pub card: ActivityCard,
    pub description: Option<String>,
    pub calories: String,
    pub max_speed_kmh: String,
    pub max_heartrate: Option<String>,
    pub photos: Vec<String>,
    pub heart_rate: Option<HeartRateSeries>,
    pub strava_url: String,
}

impl From<ActivityDetail> for ActivityDetailResponse {
    fn from(detail: ActivityDetail) -> Self {
        let act = &detail.activity;
        Self {
            card: ActivityCard::from(act),
            description: act.description.clone().filter(|d| !d.trim().is_empty()),
            calories: format::format_optional_whole(act.calories),
            max_speed_kmh: format::format_speed_kmh(act.max_speed),
            max_heartrate: act
                .max_heartrate
                .map(|hr| format::format_optional_whole(Some(hr))),
            strava_url: format::activity_link(act.id),
            photos: detail.photos,
            heart_rate: detail.heart_rate,
        }
    }
}

async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<u64>,
) -> Result<Json<ActivityDetailResponse>> {
    let detail = state.dashboard.open_activity(activity_id).await?;
    Ok(Json(detail.into()))
}
