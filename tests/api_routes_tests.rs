// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Router tests: OAuth redirects, session gating and CORS.

use athlete_dashboard::services::oauth_state::sign_state;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::{create_test_app, spawn_fake_strava, test_config, GOOD_CODE, RUN_ID};
use serde_json::Value;
use tower::ServiceExt;

mod common;

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

fn callback_uri(key: &[u8], params: &str) -> String {
    let state = sign_state(key, "http://localhost:5173", chrono::Utc::now()).unwrap();
    format!("/auth/strava/callback?state={}&{}", state, params)
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = create_test_app(athlete_dashboard::config::Config::test_default());
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_activities_require_connection() {
    let (app, _) = create_test_app(athlete_dashboard::config::Config::test_default());
    let response = get(&app, "/api/activities").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "unauthorized");

    let response = get(&app, "/api/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "pending");
}

#[tokio::test]
async fn test_auth_start_redirects_to_consent_screen() {
    let fake = spawn_fake_strava().await;
    let (app, _) = create_test_app(test_config(&fake));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/strava")
                .header(header::HOST, "localhost:8080")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let target = location(&response);
    assert!(target.starts_with(&format!("{}/oauth/authorize?", fake.base_url)));
    assert!(target.contains("client_id=test_client_id"));
    assert!(target.contains(
        "redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fstrava%2Fcallback"
    ));
    assert!(target.contains("&state="));
}

#[tokio::test]
async fn test_callback_connects_and_serves_activities() {
    let fake = spawn_fake_strava().await;
    let config = test_config(&fake);
    let key = config.oauth_state_key.clone();
    let (app, _) = create_test_app(config);

    let response = get(&app, &callback_uri(&key, &format!("code={}", GOOD_CODE))).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    // Code is gone from the URL the browser lands on.
    assert_eq!(location(&response), "http://localhost:5173");

    let status = json_body(get(&app, "/api/status").await).await;
    assert_eq!(status["status"], "success");

    let response = get(&app, "/api/activities?limit=3").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let cards = body["activities"].as_array().unwrap();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0]["label"], "CORRIDA");
    assert_eq!(cards[0]["duration"], "1h 2m 5s");
    assert_eq!(cards[0]["pace"], "5:33");
    assert_eq!(cards[0]["pace_unit"], "/km");
    assert_eq!(cards[0]["distance_km"], "10.01");
    assert_eq!(cards[0]["date_label"], "05 MAR 2025");

    // Mountain bike ride: formatted by its legacy `type`, not `sport_type`.
    assert_eq!(cards[1]["activity_type"], "Ride");
    assert_eq!(cards[1]["sport_type"], "MountainBikeRide");
    assert_eq!(cards[1]["label"], "CICLISMO");
    assert_eq!(cards[1]["pace"], "28.1");
    assert_eq!(cards[1]["pace_unit"], "km/h");

    assert_eq!(cards[2]["activity_type"], "VirtualRide");
    assert_eq!(cards[2]["sport_type"], Value::Null);
    assert_eq!(cards[2]["label"], "PEDAL VIRTUAL");
    assert_eq!(cards[2]["pace"], "36.0");
    assert_eq!(cards[2]["pace_unit"], "km/h");

    let response = get(&app, &format!("/api/activities/{}", RUN_ID)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let detail = json_body(response).await;
    assert_eq!(detail["id"], RUN_ID);
    assert_eq!(detail["calories"], "712");
    assert_eq!(detail["max_speed_kmh"], "15.8");
    assert_eq!(detail["photos"].as_array().unwrap().len(), 3);
    assert_eq!(detail["heart_rate"]["max"], 181.0);
    assert_eq!(
        detail["strava_url"],
        format!("https://www.strava.com/activities/{}", RUN_ID)
    );
}

#[tokio::test]
async fn test_callback_access_denied() {
    let fake = spawn_fake_strava().await;
    let config = test_config(&fake);
    let key = config.oauth_state_key.clone();
    let (app, _) = create_test_app(config);

    let response = get(&app, &callback_uri(&key, "error=access_denied")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        "http://localhost:5173?error=access_denied"
    );

    let status = json_body(get(&app, "/api/status").await).await;
    assert_eq!(status["status"], "error");
}

#[tokio::test]
async fn test_callback_rejects_forged_state() {
    let fake = spawn_fake_strava().await;
    let (app, _) = create_test_app(test_config(&fake));

    let response = get(
        &app,
        &callback_uri(b"someone_elses_key", &format!("code={}", GOOD_CODE)),
    )
    .await;
    assert_eq!(
        location(&response),
        "http://localhost:5173?error=invalid_state"
    );
    assert_eq!(
        common::FakeStravaState::count(&fake.state.exchanges),
        0
    );
}

#[tokio::test]
async fn test_unverified_callback_keeps_live_session() {
    let fake = spawn_fake_strava().await;
    let config = test_config(&fake);
    let key = config.oauth_state_key.clone();
    let (app, _) = create_test_app(config);

    get(&app, &callback_uri(&key, &format!("code={}", GOOD_CODE))).await;
    assert_eq!(json_body(get(&app, "/api/status").await).await["status"], "success");

    for uri in [
        "/auth/strava/callback?state=garbage",
        "/auth/strava/callback?code=other-code",
        "/auth/strava/callback?state=garbage&error=access_denied",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            location(&response),
            "http://localhost:5173?error=invalid_state"
        );
    }

    assert_eq!(json_body(get(&app, "/api/status").await).await["status"], "success");
    assert_eq!(get(&app, "/api/activities").await.status(), StatusCode::OK);
    assert_eq!(common::FakeStravaState::count(&fake.state.exchanges), 1);
}

#[tokio::test]
async fn test_logout_returns_to_pending() {
    let fake = spawn_fake_strava().await;
    let config = test_config(&fake);
    let key = config.oauth_state_key.clone();
    let (app, _) = create_test_app(config);

    get(&app, &callback_uri(&key, &format!("code={}", GOOD_CODE))).await;
    let response = get(&app, "/auth/logout").await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let status = json_body(get(&app, "/api/status").await).await;
    assert_eq!(status["status"], "pending");

    // Nothing stored any more, so reconnecting stays pending.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/connect")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(json_body(response).await["status"], "pending");
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = create_test_app(athlete_dashboard::config::Config::test_default());

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/activities")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
