// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test helpers: a fake Strava API on an ephemeral port.

use athlete_dashboard::config::Config;
use athlete_dashboard::db::LocalStore;
use athlete_dashboard::routes::create_router;
use athlete_dashboard::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Token the fake provider accepts.
#[allow(dead_code)]
pub const VALID_TOKEN: &str = "valid-access-token";
/// Authorization code the fake provider exchanges.
#[allow(dead_code)]
pub const GOOD_CODE: &str = "good-code";
#[allow(dead_code)]
pub const RUN_ID: u64 = 13023456789;
#[allow(dead_code)]
pub const RIDE_ID: u64 = 13011112222;

const ACTIVITIES: &str = include_str!("../fixtures/activities.json");
const ACTIVITY_DETAIL: &str = include_str!("../fixtures/activity_detail.json");
const HEARTRATE_STREAM: &str = include_str!("../fixtures/heartrate_stream.json");
const ATHLETE_STATS: &str = include_str!("../fixtures/athlete_stats.json");

/// Request counters and switches of the fake provider.
#[derive(Default)]
pub struct FakeStravaState {
    pub exchanges: AtomicUsize,
    pub stats_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub stream_calls: AtomicUsize,
    /// When set, every bearer token is rejected.
    pub revoked: AtomicBool,
    pub last_exchange_body: Mutex<Option<Value>>,
}

impl FakeStravaState {
    #[allow(dead_code)]
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct FakeStrava {
    pub base_url: String,
    pub state: Arc<FakeStravaState>,
}

fn authorized(state: &FakeStravaState, headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {}", VALID_TOKEN);
    !state.revoked.load(Ordering::SeqCst)
        && headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            == Some(expected.as_str())
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "message": "Authorization Error",
            "errors": [{"resource": "Athlete", "field": "access_token", "code": "invalid"}]
        })),
    )
        .into_response()
}

fn fixture(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap()
}

async fn token(State(state): State<Arc<FakeStravaState>>, Json(body): Json<Value>) -> Response {
    state.exchanges.fetch_add(1, Ordering::SeqCst);
    *state.last_exchange_body.lock().unwrap() = Some(body.clone());

    if body["code"] == GOOD_CODE && body["grant_type"] == "authorization_code" {
        Json(serde_json::json!({
            "token_type": "Bearer",
            "expires_at": 1893456000,
            "expires_in": 21600,
            "refresh_token": "refresh-token",
            "access_token": VALID_TOKEN,
            "athlete": {"id": 49665406, "firstname": "Lourenço"}
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "message": "Bad Request",
                "errors": [{"resource": "AuthorizationCode", "field": "code", "code": "invalid"}]
            })),
        )
            .into_response()
    }
}

async fn stats(
    State(state): State<Arc<FakeStravaState>>,
    Path(_athlete_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    state.stats_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    Json(fixture(ATHLETE_STATS)).into_response()
}

async fn activities(
    State(state): State<Arc<FakeStravaState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    let per_page: usize = query
        .get("per_page")
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);
    let list = fixture(ACTIVITIES);
    let items: Vec<Value> = list
        .as_array()
        .unwrap()
        .iter()
        .take(per_page)
        .cloned()
        .collect();
    Json(Value::Array(items)).into_response()
}

async fn activity(
    State(state): State<Arc<FakeStravaState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    state.detail_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    if id == RUN_ID {
        return Json(fixture(ACTIVITY_DETAIL)).into_response();
    }
    let list = fixture(ACTIVITIES);
    match list.as_array().unwrap().iter().find(|a| a["id"] == id) {
        Some(found) => Json(found.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"message": "Record Not Found"})),
        )
            .into_response(),
    }
}

async fn streams(
    State(state): State<Arc<FakeStravaState>>,
    Path(_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.stream_calls.fetch_add(1, Ordering::SeqCst);
    if !authorized(&state, &headers) {
        return unauthorized();
    }
    if query.get("keys").map(String::as_str) != Some("heartrate")
        || query.get("key_by_type").map(String::as_str) != Some("true")
    {
        return StatusCode::BAD_REQUEST.into_response();
    }
    Json(fixture(HEARTRATE_STREAM)).into_response()
}

/// Start the fake provider on 127.0.0.1 with a random port.
pub async fn spawn_fake_strava() -> FakeStrava {
    let state = Arc::new(FakeStravaState::default());
    let app = Router::new()
        .route("/oauth/token", post(token))
        .route("/api/v3/athletes/{id}/stats", get(stats))
        .route("/api/v3/athlete/activities", get(activities))
        .route("/api/v3/activities/{id}", get(activity))
        .route("/api/v3/activities/{id}/streams", get(streams))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeStrava {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// Config pointing at the fake provider.
#[allow(dead_code)]
pub fn test_config(fake: &FakeStrava) -> Config {
    Config::test_default().with_strava_base(&fake.base_url)
}

/// App state on an in-memory store.
#[allow(dead_code)]
pub fn create_test_state(config: Config) -> Arc<AppState> {
    Arc::new(AppState::new(config, LocalStore::new_mock()))
}

/// Router plus shared state on an in-memory store.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (Router, Arc<AppState>) {
    let state = create_test_state(config);
    (create_router(state.clone()), state)
}
