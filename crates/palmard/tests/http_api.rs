//! End-to-end tests for the daemon's HTTP surface, driven through the
//! router without a socket.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use palmar_core::DEFAULT_MATCH_THRESHOLD;
use palmar_store::MemoryStore;
use palmard::{engine::Engine, http_interface};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(Engine::new(store, DEFAULT_MATCH_THRESHOLD));
    http_interface::router(engine)
}

fn sample_landmarks() -> serde_json::Value {
    let points: Vec<serde_json::Value> = (0..21)
        .map(|i| {
            serde_json::json!([
                0.3 + 0.02 * i as f64,
                0.7 - 0.015 * i as f64,
                0.01 * ((i % 5) as f64)
            ])
        })
        .collect();
    serde_json::Value::Array(points)
}

async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_capture_enrolls_then_recognizes() {
    let app = app();
    let capture = serde_json::json!({
        "landmarks": sample_landmarks(),
        "confidence": 0.92,
    });

    // First sighting enrolls a new hand.
    let (status, json) = post_json(&app, "/api/hand-recognition", capture.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_new_user"], true);
    assert_eq!(json["message"], "Hand features stored");
    assert_eq!(json["registered"], false);
    let session_id = json["session_id"].as_str().unwrap().to_string();
    assert!(!session_id.is_empty());

    // The identical capture matches with zero distance.
    let (status, json) = post_json(&app, "/api/hand-recognition", capture).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_new_user"], false);
    assert_eq!(json["message"], "User exists");
    assert_eq!(json["similarity"], 0.0);
    assert_eq!(json["registered"], false);
    assert!(json.get("session_id").is_none());
}

#[tokio::test]
async fn test_capture_with_empty_landmarks_is_rejected() {
    let app = app();
    let capture = serde_json::json!({ "landmarks": [], "confidence": 0.5 });

    let (status, json) = post_json(&app, "/api/hand-recognition", capture).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().contains("empty landmark"));
}

#[tokio::test]
async fn test_register_unknown_session_is_404() {
    let app = app();
    let register = serde_json::json!({
        "sessionId": "00000000-0000-0000-0000-000000000000",
        "name": "Mira Chen",
        "age": 29,
        "contact": "+1-555-0123",
        "email": "mira@example.com",
        "address": "4 Quay Street",
    });

    let (status, json) = post_json(&app, "/api/register-user", register).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .contains("00000000-0000-0000-0000-000000000000"));
}

#[tokio::test]
async fn test_full_enroll_register_recognize_flow() {
    let app = app();
    let capture = serde_json::json!({
        "landmarks": sample_landmarks(),
        "confidence": 0.9,
    });

    let (_, json) = post_json(&app, "/api/hand-recognition", capture.clone()).await;
    let session_id = json["session_id"].as_str().unwrap().to_string();

    let register = serde_json::json!({
        "sessionId": session_id,
        "name": "Mira Chen",
        "age": 29,
        "contact": "+1-555-0123",
        "email": "mira@example.com",
        "address": "4 Quay Street",
    });
    let (status, json) = post_json(&app, "/api/register-user", register).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Registration successful");

    // The same hand now reports as registered.
    let (status, json) = post_json(&app, "/api/hand-recognition", capture).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_new_user"], false);
    assert_eq!(json["registered"], true);
}
