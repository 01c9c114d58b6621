// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity time-series streams.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Streams response with `key_by_type=true`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamSet {
    #[serde(default)]
    pub heartrate: Option<Stream>,
}

/// One stream; only the samples are used.
#[derive(Debug, Clone, Deserialize)]
pub struct Stream {
    #[serde(default)]
    pub data: Vec<f64>,
}

/// Heart-rate samples for one activity, with their range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HeartRateSeries {
    pub samples: Vec<f64>,
    pub min: f64,
    pub max: f64,
}

impl HeartRateSeries {
    /// Build a series; `None` when there are no usable samples.
    pub fn from_samples(samples: Vec<f64>) -> Option<Self> {
        let samples: Vec<f64> = samples.into_iter().filter(|v| v.is_finite()).collect();
        let min = samples.iter().copied().reduce(f64::min)?;
        let max = samples.iter().copied().reduce(f64::max)?;
        Some(Self { samples, min, max })
    }
}

impl StreamSet {
    pub fn into_heart_rate(self) -> Option<HeartRateSeries> {
        self.heartrate
            .and_then(|stream| HeartRateSeries::from_samples(stream.data))
    }
}
