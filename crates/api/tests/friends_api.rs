//! HTTP-level tests for friend requests and friend-aware event details.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_event, get, get_auth, post_auth, post_json_auth, register_user, user_id,
};
use serde_json::json;

#[tokio::test]
async fn test_friend_request_flow() {
    let app = common::build_test_app();
    let ana = register_user(&app, "Ana").await;
    let rui = register_user(&app, "Rui").await;
    let ana_id = user_id(&app, &ana).await;
    let rui_id = user_id(&app, &rui).await;

    let uri = format!("/api/v1/users/{rui_id}/friend-request");
    let response = post_json_auth(&app, &uri, json!({}), &ana).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await["message"],
        "Friend request sent successfully"
    );

    let response = post_auth(&app, &uri, &ana).await;
    assert_eq!(body_json(response).await["message"], "Friend request already sent");

    let pending = body_json(get_auth(&app, "/api/v1/friends/requests", &rui).await).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["requester"]["id"], ana_id);
    assert_eq!(pending[0]["requester"]["name"], "Ana");
    let request_id = pending[0]["id"].as_i64().unwrap();

    let accept_uri = format!("/api/v1/friends/requests/{request_id}/accept");
    let response = post_auth(&app, &accept_uri, &ana).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_auth(&app, &accept_uri, &rui).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Friend request accepted");

    let friends = body_json(get_auth(&app, "/api/v1/friends", &ana).await).await;
    assert_eq!(friends, json!([{ "id": rui_id, "name": "Rui", "city": "Lisbon" }]));

    let response = post_auth(&app, &uri, &ana).await;
    assert_eq!(
        body_json(response).await["message"],
        "You are already friends with this user"
    );
}

#[tokio::test]
async fn test_friend_request_errors() {
    let app = common::build_test_app();
    let ana = register_user(&app, "Ana").await;
    let ana_id = user_id(&app, &ana).await;

    let response = post_auth(&app, &format!("/api/v1/users/{ana_id}/friend-request"), &ana).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_auth(&app, "/api/v1/users/9999/friend-request", &ana).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "User not found");

    let response = post_auth(&app, "/api/v1/users/abc/friend-request", &ana).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_ID");
}

#[tokio::test]
async fn test_event_detail_marks_friends_for_the_viewer() {
    let app = common::build_test_app();
    let org = register_user(&app, "Org").await;
    let alice = register_user(&app, "Alice").await;
    let carol = register_user(&app, "Carol").await;
    let alice_id = user_id(&app, &alice).await;
    let event_id = create_event(&app, &org, 10, None).await;

    post_auth(&app, &format!("/api/v1/events/{event_id}/register"), &alice).await;
    post_auth(&app, &format!("/api/v1/users/{alice_id}/friend-request"), &carol).await;
    let pending = body_json(get_auth(&app, "/api/v1/friends/requests", &alice).await).await;
    let request_id = pending[0]["id"].as_i64().unwrap();
    post_auth(
        &app,
        &format!("/api/v1/friends/requests/{request_id}/accept"),
        &alice,
    )
    .await;

    let uri = format!("/api/v1/events/{event_id}");
    let anonymous = body_json(get(&app, &uri).await).await;
    assert_eq!(anonymous["participants"][0]["id"], alice_id);
    assert_eq!(anonymous["participants"][0]["is_friend"], false);

    let as_carol = body_json(get_auth(&app, &uri, &carol).await).await;
    assert_eq!(as_carol["participants"][0]["is_friend"], true);

    let as_org = body_json(get_auth(&app, &uri, &org).await).await;
    assert_eq!(as_org["participants"][0]["is_friend"], false);

    // A bad token on a public route is still rejected.
    let response = get_auth(&app, &uri, "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
