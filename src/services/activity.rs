// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity fetching and normalization.
//!
//! Opening an activity is two sequential requests:
//! 1. Fetch the full detail (supersedes the list summary)
//! 2. Fetch the heart-rate stream, only if the detail says one exists

use crate::error::{AppError, Result};
use crate::models::{extract_all_photos, Activity, HeartRateSeries};
use crate::services::strava::StravaClient;

/// Strava caps `per_page` at 200.
pub const MAX_ACTIVITY_LIMIT: u32 = 200;

/// Detail of one activity with its derived data.
#[derive(Debug, Clone)]
pub struct ActivityDetail {
    pub activity: Activity,
    /// Photo gallery, primary first, no duplicates.
    pub photos: Vec<String>,
    pub heart_rate: Option<HeartRateSeries>,
}

/// Fetches activities and derives display data.
#[derive(Clone)]
pub struct ActivityService {
    client: StravaClient,
}

impl ActivityService {
    pub fn new(client: StravaClient) -> Self {
        Self { client }
    }

    /// Most recent activities, newest first.
    pub async fn list_activities(&self, token: &str, limit: u32) -> Result<Vec<Activity>> {
        if limit == 0 || limit > MAX_ACTIVITY_LIMIT {
            return Err(AppError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_ACTIVITY_LIMIT
            )));
        }

        let activities = self.client.list_activities(token, limit).await?;
        tracing::debug!(count = activities.len(), limit, "Fetched activities");
        Ok(activities)
    }

    /// Full detail of one activity.
    pub async fn get_activity_detail(&self, token: &str, activity_id: u64) -> Result<Activity> {
        self.client.get_activity(token, activity_id).await
    }

    /// Heart-rate samples, if the activity recorded any.
    ///
    /// A missing or unreadable stream is reported as `None`. Only a rejected
    /// token is passed through so the session can react to it.
    pub async fn get_heart_rate_series(
        &self,
        token: &str,
        activity: &Activity,
    ) -> Result<Option<HeartRateSeries>> {
        if !activity.has_heartrate {
            return Ok(None);
        }

        match self.client.get_heartrate_stream(token, activity.id).await {
            Ok(streams) => Ok(streams.into_heart_rate()),
            Err(e) if e.is_token_rejection() => Err(e),
            Err(e) => {
                tracing::warn!(
                    activity_id = activity.id,
                    error = %e,
                    "Heart-rate stream unavailable"
                );
                Ok(None)
            }
        }
    }

    /// Everything the detail view needs for one activity.
    pub async fn open_activity(&self, token: &str, activity_id: u64) -> Result<ActivityDetail> {
        let activity = self.get_activity_detail(token, activity_id).await?;
        let heart_rate = self.get_heart_rate_series(token, &activity).await?;
        let photos = extract_all_photos(&activity);

        tracing::info!(
            activity_id,
            photos = photos.len(),
            heart_rate_samples = heart_rate.as_ref().map(|s| s.samples.len()),
            "Activity opened"
        );

        Ok(ActivityDetail {
            activity,
            photos,
            heart_rate,
        })
    }
}
