//! HTTP-level tests for registration, login and the caller's profile.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, register_user, user_id, TEST_JWT_SECRET};
use eventsync_api::auth::jwt::AccessTokens;
use serde_json::json;

#[tokio::test]
async fn test_register_returns_token_for_me() {
    let app = common::build_test_app();
    let token = register_user(&app, "Ana").await;

    let response = get_auth(&app, "/api/v1/users/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["id"].is_i64());
    assert_eq!(json["name"], "Ana");
    assert_eq!(json["email"], "ana@example.com");
    assert_eq!(json["city"], "Lisbon");
    assert!(json.get("password_hash").is_none(), "hash must never be exposed");
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = common::build_test_app();
    register_user(&app, "Ana").await;

    let body = json!({
        "name": "Another Ana",
        "email": "ANA@example.com",
        "password": "secret123",
        "city": "Porto",
    });
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["error"], "User with this email already exists");
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_validates_input() {
    let app = common::build_test_app();
    let body = json!({
        "name": "A",
        "email": "not-an-email",
        "password": "123",
        "city": "Lisbon",
    });
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("email"), "got {message}");
    assert!(message.contains("name"), "got {message}");
    assert!(message.contains("password"), "got {message}");
}

#[tokio::test]
async fn test_login_success() {
    let app = common::build_test_app();
    register_user(&app, "Rui").await;

    let body = json!({ "email": "rui@example.com", "password": "secret123" });
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string();
    let me = get_auth(&app, "/api/v1/users/me", &token).await;
    assert_eq!(me.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = common::build_test_app();
    register_user(&app, "Rui").await;

    let wrong_password = json!({ "email": "rui@example.com", "password": "nope-nope" });
    let response = post_json(&app, "/api/v1/auth/login", wrong_password).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid credentials");

    let unknown = json!({ "email": "ghost@example.com", "password": "secret123" });
    let response = post_json(&app, "/api/v1/auth/login", unknown).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = common::build_test_app();

    let response = get(&app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = get_auth(&app, "/api/v1/users/me", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_are_told_apart() {
    let app = common::build_test_app();
    let token = register_user(&app, "Ana").await;
    let id = user_id(&app, &token).await;

    let expired = AccessTokens::new(TEST_JWT_SECRET, -1).issue(id).unwrap();
    let response = get_auth(&app, "/api/v1/users/me", &expired).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Token has expired");

    let foreign = AccessTokens::new("another-deployment", 30).issue(id).unwrap();
    let response = get_auth(&app, "/api/v1/users/me", &foreign).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Invalid token");
}
