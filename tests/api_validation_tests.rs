// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.
//!
//! Everything here must be rejected before any storage access, so the
//! offline mock database is sufficient.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn authed_request(
    method: Method,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token));

    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_complete_trip_rejects_bad_latitude() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(12345, &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "start_lat": 91.0,
        "start_lng": 0.0,
        "end_lat": 0.0,
        "end_lng": 0.0,
        "distance_m": 1000.0,
        "duration_s": 600,
        "route": ""
    });

    let response = app
        .oneshot(authed_request(
            Method::POST,
            "/api/trips/complete",
            &token,
            Some(body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_complete_trip_rejects_zero_duration() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(12345, &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "start_lat": 37.0,
        "start_lng": -122.0,
        "end_lat": 37.01,
        "end_lng": -122.0,
        "distance_m": 1000.0,
        "duration_s": 0,
        "route": ""
    });

    let response = app
        .oneshot(authed_request(
            Method::POST,
            "/api/trips/complete",
            &token,
            Some(body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_complete_trip_rejects_negative_distance() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(12345, &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "start_lat": 37.0,
        "start_lng": -122.0,
        "end_lat": 37.01,
        "end_lng": -122.0,
        "distance_m": -5.0,
        "duration_s": 600,
        "route": ""
    });

    let response = app
        .oneshot(authed_request(
            Method::POST,
            "/api/trips/complete",
            &token,
            Some(body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plant_outside_grid_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(12345, &state.config.jwt_signing_key);

    let body = serde_json::json!({ "x": 10, "y": 0, "type": "pine" });
    let response = app
        .oneshot(authed_request(
            Method::POST,
            "/api/garden/plant",
            &token,
            Some(body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plant_on_house_tiles_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(12345, &state.config.jwt_signing_key);

    // The whole reserved 2x2 block at the center of the 10x10 grid
    for (x, y) in [(4, 4), (5, 4), (4, 5), (5, 5)] {
        let body = serde_json::json!({ "x": x, "y": y, "type": "pine" });
        let response = app
            .clone()
            .oneshot(authed_request(
                Method::POST,
                "/api/garden/plant",
                &token,
                Some(body),
            ))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "tile ({}, {})",
            x,
            y
        );
    }
}

#[tokio::test]
async fn test_plant_withered_tree_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(12345, &state.config.jwt_signing_key);

    let body = serde_json::json!({ "x": 0, "y": 0, "type": "withered" });
    let response = app
        .oneshot(authed_request(
            Method::POST,
            "/api/garden/plant",
            &token,
            Some(body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_coins_rejects_zero_amount() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(12345, &state.config.jwt_signing_key);

    let body = serde_json::json!({ "amount": 0 });
    let response = app
        .oneshot(authed_request(
            Method::POST,
            "/api/coins/add",
            &token,
            Some(body),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trips_invalid_cursor_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt(12345, &state.config.jwt_signing_key);

    let response = app
        .oneshot(authed_request(
            Method::GET,
            "/api/trips?cursor=%21%21not-base64",
            &token,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_previous_week_range_enforced() {
    let (app, _state) = common::create_test_app();

    for weeks_ago in [0u32, 53] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/leaderboard/week/previous?weeks_ago={}", weeks_ago))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
