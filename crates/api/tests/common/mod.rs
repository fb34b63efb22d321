#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use eventsync_api::config::{ServerConfig, StoreBackend};
use eventsync_api::router::build_router;
use eventsync_api::state::AppState;
use eventsync_db::MemoryStore;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        token_lifetime_mins: 30,
    }
}

/// Build the production router over a fresh in-memory store.
///
/// Cloning the returned router shares the store, so one test can issue
/// several requests against the same data.
pub fn build_test_app() -> Router {
    let state = AppState::new(Arc::new(MemoryStore::new()), Arc::new(test_config()));
    build_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, request("GET", uri, None, None)).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request("GET", uri, Some(token), None)).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, request("POST", uri, None, Some(body))).await
}

pub async fn post_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, request("POST", uri, Some(token), Some(body))).await
}

pub async fn post_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request("POST", uri, Some(token), None)).await
}

pub async fn put_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, request("PUT", uri, Some(token), Some(body))).await
}

pub async fn patch_json_auth(app: &Router, uri: &str, body: Value, token: &str) -> Response<Body> {
    send(app, request("PATCH", uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request("DELETE", uri, Some(token), None)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register a user through the API and return its access token.
pub async fn register_user(app: &Router, name: &str) -> String {
    let body = json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "password": "secret123",
        "city": "Lisbon",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["token"]
        .as_str()
        .expect("token should be a string")
        .to_string()
}

/// The id of the user owning `token`.
pub async fn user_id(app: &Router, token: &str) -> i64 {
    let response = get_auth(app, "/api/v1/users/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().expect("id")
}

/// Create an event as the owner of `token` and return its id.
pub async fn create_event(app: &Router, token: &str, capacity: i32, price: Option<f64>) -> i64 {
    let body = json!({
        "title": "Forro night",
        "banner": "https://img.example.com/forro.png",
        "event_date": "2026-11-20",
        "event_time": "20:30:00",
        "price": price,
        "capacity": capacity,
        "category": "Music",
        "description": "Live band",
        "location": "Lisbon",
        "rules": ["No smoking"],
        "organizer_name": "Org",
        "organizer_rating": 4.5,
    });
    let response = post_json_auth(app, "/api/v1/events", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["event_id"].as_i64().expect("event_id")
}
