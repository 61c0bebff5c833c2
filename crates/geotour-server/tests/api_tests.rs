//! Integration tests for the tour API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. The engine runs over the in-memory store, so no
//! database is needed.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use geotour_core::geo::EARTH_RADIUS_M;
use geotour_core::{MemoryStore, NotificationDispatcher, ProgressionEngine};
use geotour_db::TourStore;
use geotour_server::router::build_router;
use geotour_server::state::AppState;
use geotour_types::{Stop, StopId};
use serde_json::{Value, json};
use tower::ServiceExt;

fn stop(id: &str, sequence: i32, title: &str, lat: f64) -> Stop {
    Stop {
        id: StopId::from(id),
        sequence,
        title: String::from(title),
        story: format!("The story of {title}."),
        overlay_image: Some(format!("/overlays/{id}.png")),
        audio_src: None,
        lat,
        lng: 0.0,
        radius_meters: 1000.0,
    }
}

fn make_test_state() -> Arc<AppState> {
    let store = MemoryStore::with_stops(vec![
        stop("b", 2, "Stop B", 0.5),
        stop("a", 1, "Stop A", 0.0),
    ]);
    let engine = ProgressionEngine::new(TourStore::Memory(store), NotificationDispatcher::disabled());
    Arc::new(AppState::new(engine))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(state: &Arc<AppState>, uri: &str, body: &Value) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn get_json(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn start_session(state: &Arc<AppState>) -> String {
    let (status, json) = post_json(state, "/api/session/start", &json!({})).await;
    assert_eq!(status, StatusCode::OK);
    json["sessionId"].as_str().unwrap().to_owned()
}

async fn report(state: &Arc<AppState>, session_id: &str, lat: f64, lng: f64) -> (StatusCode, Value) {
    post_json(
        state,
        "/api/location/update",
        &json!({ "sessionId": session_id, "lat": lat, "lng": lng }),
    )
    .await
}

#[tokio::test]
async fn index_returns_banner() {
    let state = make_test_state();
    let response = build_router(state)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("running"));
}

#[tokio::test]
async fn start_session_returns_uuid() {
    let state = make_test_state();
    let id = start_session(&state).await;
    assert!(uuid::Uuid::parse_str(&id).is_ok());
}

#[tokio::test]
async fn full_tour_over_http() {
    let state = make_test_state();
    let id = start_session(&state).await;

    let (status, json) = report(&state, &id, 0.0, 0.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["triggered"], true);
    assert_eq!(json["stop"]["id"], "a");
    assert_eq!(json["stop"]["overlay_image"], "/overlays/a.png");
    assert!(json.get("done").is_none());

    let (_, json) = report(&state, &id, 0.5, 0.0).await;
    assert_eq!(json["triggered"], true);
    assert_eq!(json["stop"]["id"], "b");

    let (status, json) = report(&state, &id, 0.5, 0.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "done": true }));

    let (status, json) = get_json(&state, &format!("/api/session/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["cursor"], 2);
    assert_eq!(json["totalStops"], 2);
    assert_eq!(json["complete"], true);
}

#[tokio::test]
async fn distant_fix_reports_distance_and_next_title() {
    let state = make_test_state();
    let id = start_session(&state).await;

    let lat = (5000.0 / EARTH_RADIUS_M).to_degrees();
    let (status, json) = report(&state, &id, lat, 0.0).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({ "triggered": false, "distance": 5000, "nextStopTitle": "Stop A" })
    );
}

#[tokio::test]
async fn later_stop_does_not_trigger_early() {
    let state = make_test_state();
    let id = start_session(&state).await;

    let (_, json) = report(&state, &id, 0.5, 0.0).await;
    assert_eq!(json["triggered"], false);
    assert_eq!(json["nextStopTitle"], "Stop A");

    let (_, status) = get_json(&state, &format!("/api/session/{id}")).await;
    assert_eq!(status["cursor"], 0);
    assert_eq!(status["complete"], false);
}

#[tokio::test]
async fn unknown_session_is_404() {
    let state = make_test_state();
    let unknown = uuid::Uuid::now_v7().to_string();

    let (status, json) = report(&state, &unknown, 0.0, 0.0).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert!(json["error"].is_string());

    let (status, _) = get_json(&state, &format!("/api/session/{unknown}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_requests_are_400() {
    let state = make_test_state();
    let id = start_session(&state).await;

    let (status, json) = report(&state, "not-a-uuid", 0.0, 0.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (status, _) = post_json(
        &state,
        "/api/location/update",
        &json!({ "sessionId": id, "lat": 0.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &state,
        "/api/location/update",
        &json!({ "sessionId": id, "lat": "north", "lng": 0.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = report(&state, &id, 123.0, 0.0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // None of the rejected requests moved the cursor.
    let (_, json) = get_json(&state, &format!("/api/session/{id}")).await;
    assert_eq!(json["cursor"], 0);
}

#[tokio::test]
async fn stops_are_listed_in_tour_order() {
    let state = make_test_state();
    let (status, json) = get_json(&state, "/api/stops").await;
    assert_eq!(status, StatusCode::OK);

    let stops = json.as_array().unwrap();
    assert_eq!(stops.len(), 2);
    assert_eq!(stops[0]["id"], "a");
    assert_eq!(stops[0]["sequence"], 1);
    assert_eq!(stops[0]["radius_meters"], 1000.0);
    assert!(stops[0].get("story").is_none());
    assert_eq!(stops[1]["id"], "b");
}

#[tokio::test]
async fn single_stop_lookup() {
    let state = make_test_state();

    let (status, json) = get_json(&state, "/api/stops/b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Stop B");
    assert_eq!(json["story"], "The story of Stop B.");

    let (status, json) = get_json(&state, "/api/stops/nowhere").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}
