// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod photo;
pub mod session;
pub mod stats;
pub mod stream;

pub use activity::Activity;
pub use photo::{extract_all_photos, extract_photo_url, Photo, Photos};
pub use session::{ConnectionStatus, Session, SessionEvent};
pub use stats::{ActivityTotal, AthleteStats};
pub use stream::{HeartRateSeries, StreamSet};
