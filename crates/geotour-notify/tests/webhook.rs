//! Webhook sink tests against a local Axum receiver.
//!
//! A throwaway HTTP server is bound to an ephemeral port on loopback; the
//! webhook sink posts to it and the test inspects what arrived.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use chrono::Utc;
use geotour_notify::{DeviceNotifier, NotifyError, WebhookNotifier, spawn_notification_worker};
use geotour_types::{SessionId, Stop, StopId, TriggerEvent};
use tokio::sync::mpsc;

type Received = Arc<Mutex<Vec<TriggerEvent>>>;

async fn record(State(received): State<Received>, Json(event): Json<TriggerEvent>) -> StatusCode {
    received.lock().unwrap().push(event);
    StatusCode::NO_CONTENT
}

async fn reject() -> StatusCode {
    StatusCode::SERVICE_UNAVAILABLE
}

/// Serve `router` on an ephemeral loopback port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn event(stop_id: &str) -> TriggerEvent {
    TriggerEvent {
        session_id: SessionId::new(),
        stop: Stop {
            id: StopId::from(stop_id),
            sequence: 3,
            title: String::from("Innovation Hub"),
            story: String::from("Where ideas become startups."),
            overlay_image: Some(String::from("/overlays/innovation-hub.png")),
            audio_src: None,
            lat: 25.594,
            lng: 85.1375,
            radius_meters: 40.0,
        },
        triggered_at: Utc::now(),
    }
}

#[tokio::test]
async fn webhook_posts_event_json() {
    let received: Received = Arc::default();
    let router = Router::new()
        .route("/trigger", post(record))
        .with_state(Arc::clone(&received));
    let base = serve(router).await;

    let sink = WebhookNotifier::new(format!("{base}/trigger"), Duration::from_secs(2)).unwrap();
    let (tx, rx) = mpsc::channel(4);
    let worker = spawn_notification_worker(rx, DeviceNotifier::Webhook(sink));

    let sent = event("innovation-hub");
    tx.send(sent.clone()).await.unwrap();
    drop(tx);

    let stats = worker.await.unwrap();
    assert_eq!(stats.delivered, 1);

    let got = received.lock().unwrap().clone();
    assert_eq!(got.len(), 1);
    let first = got.first().unwrap();
    assert_eq!(first.session_id, sent.session_id);
    assert_eq!(first.stop.id, sent.stop.id);
    assert_eq!(first.stop.overlay_image, sent.stop.overlay_image);
    assert_eq!(first.triggered_at, sent.triggered_at);
}

#[tokio::test]
async fn webhook_error_status_is_reported() {
    let base = serve(Router::new().route("/trigger", post(reject))).await;

    let sink = DeviceNotifier::Webhook(
        WebhookNotifier::new(format!("{base}/trigger"), Duration::from_secs(2)).unwrap(),
    );
    let result = sink.notify(&event("library")).await;
    assert!(matches!(result, Err(NotifyError::Status { status: 503 })));
}
