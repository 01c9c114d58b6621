// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity photo references.
//!
//! Strava reports photos in several shapes depending on the endpoint and
//! the age of the activity:
//! - `{"urls": {"100": "...", "600": "..."}}` (size-keyed variants)
//! - `{"url": "..."}` or `{"uri": "..."}`
//! - a bare URL string (legacy `primary_photo`)
//!
//! All of them decode into one [`Photo`]. Anything else is rejected at
//! deserialization time instead of being guessed at.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::models::Activity;

/// Canonical photo: size-keyed URL variants plus an unsized fallback link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPhoto")]
pub struct Photo {
    /// URL variants keyed by pixel size.
    #[serde(rename = "urls")]
    pub sized: BTreeMap<u32, String>,
    /// `url`/`uri` field or a bare string.
    #[serde(rename = "url", skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Photo {
    /// A photo that is just a URL.
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            sized: BTreeMap::new(),
            link: Some(url.into()),
        }
    }

    /// Best URL: the largest sized variant, else the unsized link.
    pub fn best_url(&self) -> Option<&str> {
        self.sized
            .last_key_value()
            .map(|(_, url)| url.as_str())
            .or(self.link.as_deref())
            .filter(|url| !url.is_empty())
    }
}

/// Photo block of a detailed activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photos {
    #[serde(default)]
    pub primary: Option<Photo>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub all: Vec<Photo>,
}

/// Known wire shapes of a photo reference.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPhoto {
    Bare(String),
    Object(RawPhotoObject),
}

#[derive(Deserialize)]
struct RawPhotoObject {
    #[serde(default)]
    urls: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

impl TryFrom<RawPhoto> for Photo {
    type Error = String;

    fn try_from(raw: RawPhoto) -> Result<Self, Self::Error> {
        match raw {
            RawPhoto::Bare(url) => Ok(Photo::from_url(url)),
            RawPhoto::Object(obj) => {
                let mut sized = BTreeMap::new();
                for (key, url) in obj.urls.unwrap_or_default() {
                    let size: u32 = key
                        .trim()
                        .parse()
                        .map_err(|_| format!("unrecognized photo size key {:?}", key))?;
                    if let Some(url) = url {
                        sized.insert(size, url);
                    }
                }
                Ok(Photo {
                    sized,
                    link: obj.url.or(obj.uri),
                })
            }
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Photo>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Photo>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Best single photo URL for an activity.
///
/// Order: `photos.primary`, first entry of `photos.all`, legacy
/// `primary_photo`.
pub fn extract_photo_url(activity: &Activity) -> Option<&str> {
    let photos = activity.photos.as_ref();

    photos
        .and_then(|p| p.primary.as_ref())
        .and_then(Photo::best_url)
        .or_else(|| photos.and_then(|p| p.all.first()).and_then(Photo::best_url))
        .or_else(|| activity.primary_photo.as_ref().and_then(Photo::best_url))
}

/// Every photo URL for an activity, primary first, without duplicates.
pub fn extract_all_photos(activity: &Activity) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    let mut push = |url: &str| {
        if !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    };

    if let Some(main) = extract_photo_url(activity) {
        push(main);
    }
    if let Some(photos) = &activity.photos {
        photos
            .all
            .iter()
            .filter_map(Photo::best_url)
            .for_each(&mut push);
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn activity_with(extra: serde_json::Value) -> Activity {
        let mut base = json!({
            "id": 1,
            "name": "Morning Run",
            "type": "Run",
            "start_date": "2025-03-05T09:30:00Z",
            "distance": 5000.0,
            "moving_time": 1500,
            "total_elevation_gain": 12.0,
            "average_speed": 3.3,
            "max_speed": 4.1
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(base).expect("activity should decode")
    }

    #[test]
    fn test_legacy_photo_only() {
        let act = activity_with(json!({ "primary_photo": "https://img/legacy.jpg" }));
        assert_eq!(extract_photo_url(&act), Some("https://img/legacy.jpg"));
        assert_eq!(extract_all_photos(&act), vec!["https://img/legacy.jpg"]);
    }

    #[test]
    fn test_largest_size_key_wins() {
        let act = activity_with(json!({
            "photos": { "primary": { "urls": {
                "100": "https://img/100.jpg",
                "2048": "https://img/2048.jpg",
                "600": "https://img/600.jpg"
            }}}
        }));
        assert_eq!(extract_photo_url(&act), Some("https://img/2048.jpg"));
    }

    #[test]
    fn test_numeric_not_lexical_ordering() {
        let photo: Photo = serde_json::from_value(json!({
            "urls": { "9": "https://img/9.jpg", "10": "https://img/10.jpg" }
        }))
        .unwrap();
        assert_eq!(photo.best_url(), Some("https://img/10.jpg"));
    }

    #[test]
    fn test_url_then_uri_fallback() {
        let photo: Photo =
            serde_json::from_value(json!({ "url": "https://a", "uri": "https://b" })).unwrap();
        assert_eq!(photo.best_url(), Some("https://a"));

        let photo: Photo = serde_json::from_value(json!({ "uri": "https://b" })).unwrap();
        assert_eq!(photo.best_url(), Some("https://b"));

        let photo: Photo = serde_json::from_value(json!({ "urls": {}, "id": 7 })).unwrap();
        assert_eq!(photo.best_url(), None);
    }

    #[test]
    fn test_falls_back_to_first_gallery_entry() {
        let act = activity_with(json!({
            "photos": {
                "primary": null,
                "all": [{ "url": "https://img/a.jpg" }, { "url": "https://img/b.jpg" }]
            },
            "primary_photo": "https://img/legacy.jpg"
        }));
        assert_eq!(extract_photo_url(&act), Some("https://img/a.jpg"));
    }

    #[test]
    fn test_gallery_dedup_primary_first() {
        let act = activity_with(json!({
            "photos": {
                "primary": { "urls": { "600": "https://img/p.jpg" } },
                "all": [
                    { "url": "https://img/x.jpg" },
                    { "urls": { "600": "https://img/p.jpg" } },
                    "https://img/x.jpg",
                    { "uri": "https://img/y.jpg" }
                ]
            }
        }));
        assert_eq!(
            extract_all_photos(&act),
            vec!["https://img/p.jpg", "https://img/x.jpg", "https://img/y.jpg"]
        );
    }

    #[test]
    fn test_no_photos() {
        let act = activity_with(json!({ "photos": { "primary": null, "count": 0 } }));
        assert_eq!(extract_photo_url(&act), None);
        assert!(extract_all_photos(&act).is_empty());
    }

    #[test]
    fn test_rejects_unrecognized_shapes() {
        assert!(serde_json::from_value::<Photo>(json!(42)).is_err());
        assert!(serde_json::from_value::<Photo>(json!(["https://a"])).is_err());
        assert!(
            serde_json::from_value::<Photo>(json!({ "urls": { "large": "https://a" } })).is_err()
        );
    }
}
