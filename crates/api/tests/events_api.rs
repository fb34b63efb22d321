//! HTTP-level tests for events and the registration flow.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_event, delete_auth, get, get_auth, patch_json_auth, post_auth,
    post_json_auth, put_json_auth, register_user, user_id,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_then_fetch_detail() {
    let app = common::build_test_app();
    let org = register_user(&app, "Org").await;
    let org_id = user_id(&app, &org).await;
    let event_id = create_event(&app, &org, 12, Some(25.0)).await;

    let response = get(&app, &format!("/api/v1/events/{event_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], event_id);
    assert_eq!(json["capacity"], 12);
    assert_eq!(json["remaining_seats"], 12);
    assert_eq!(json["status"], "open");
    assert_eq!(json["event_time"], "20:30:00");
    assert_eq!(json["organizer"]["id"], org_id);
    assert_eq!(json["organizer"]["rating"], 4.5);
    assert_eq!(json["participants"], json!([]));
}

#[tokio::test]
async fn test_create_event_requires_auth_and_valid_body() {
    let app = common::build_test_app();
    let org = register_user(&app, "Org").await;

    let response = common::post_json(&app, "/api/v1/events", json!({})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json!({
        "title": "Forro night",
        "event_date": "2026-11-20",
        "event_time": "20:30:00",
        "capacity": 0,
        "category": "Music",
        "location": "Lisbon",
        "organizer_name": "Org",
    });
    let response = post_json_auth(&app, "/api/v1/events", body, &org).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_listings() {
    let app = common::build_test_app();
    let ana = register_user(&app, "Ana").await;
    let rui = register_user(&app, "Rui").await;
    let first = create_event(&app, &ana, 3, None).await;
    let second = create_event(&app, &rui, 4, None).await;

    let all = body_json(get(&app, "/api/v1/events").await).await;
    let ids: Vec<i64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);

    let organized = body_json(get_auth(&app, "/api/v1/events/organized", &ana).await).await;
    assert_eq!(organized.as_array().unwrap().len(), 1);
    assert_eq!(organized[0]["id"], first);
    assert_eq!(organized[0]["remaining_seats"], 3);
}

#[tokio::test]
async fn test_update_and_delete_are_organizer_only() {
    let app = common::build_test_app();
    let org = register_user(&app, "Org").await;
    let other = register_user(&app, "Other").await;
    let event_id = create_event(&app, &org, 5, None).await;
    let uri = format!("/api/v1/events/{event_id}");

    let change = json!({ "title": "Samba night" });
    let response = put_json_auth(&app, &uri, change.clone(), &other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await["error"],
        "You are not the organizer of this event"
    );

    let response = put_json_auth(&app, &uri, change.clone(), &org).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Event updated successfully");

    let response = put_json_auth(&app, &uri, change, &org).await;
    assert_eq!(body_json(response).await["message"], "No changes were made");

    let response = delete_auth(&app, &uri, &other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(&app, &uri, &org).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get(&app, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_status_changes() {
    let app = common::build_test_app();
    let org = register_user(&app, "Org").await;
    let event_id = create_event(&app, &org, 2, None).await;
    let uri = format!("/api/v1/events/{event_id}/status");

    let response = patch_json_auth(&app, &uri, json!({ "status": "full" }), &org).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_STATE");

    let response = patch_json_auth(&app, &uri, json!({ "status": "archived" }), &org).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(&app, &uri, json!({ "status": "closed" }), &org).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Event status updated to closed"
    );

    let guest = register_user(&app, "Guest").await;
    let response = post_auth(&app, &format!("/api/v1/events/{event_id}/register"), &guest).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"],
        "Event is closed for registration"
    );
}

// ---------------------------------------------------------------------------
// Registration flow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_capacity_one_scenario() {
    let app = common::build_test_app();
    let org = register_user(&app, "Org").await;
    let alice = register_user(&app, "Alice").await;
    let bob = register_user(&app, "Bob").await;
    let event_id = create_event(&app, &org, 1, None).await;
    let register_uri = format!("/api/v1/events/{event_id}/register");
    let detail_uri = format!("/api/v1/events/{event_id}");

    let response = post_auth(&app, &register_uri, &alice).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let receipt = body_json(response).await;
    assert_eq!(receipt["message"], "Registration successful");
    let alice_registration = receipt["registration_id"].as_i64().unwrap();

    let detail = body_json(get(&app, &detail_uri).await).await;
    assert_eq!(detail["status"], "full");
    assert_eq!(detail["remaining_seats"], 0);

    let response = post_auth(&app, &register_uri, &alice).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_auth(&app, &register_uri, &bob).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Event is full");

    let response = post_auth(
        &app,
        &format!("/api/v1/registrations/{alice_registration}/cancel"),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Registration cancelled successfully"
    );

    let detail = body_json(get(&app, &detail_uri).await).await;
    assert_eq!(detail["status"], "open");
    assert_eq!(detail["remaining_seats"], 1);

    let response = post_auth(&app, &register_uri, &bob).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_free_and_paid_registrations() {
    let app = common::build_test_app();
    let org = register_user(&app, "Org").await;
    let alice = register_user(&app, "Alice").await;
    let free = create_event(&app, &org, 5, None).await;
    let paid = create_event(&app, &org, 5, Some(15.0)).await;

    post_auth(&app, &format!("/api/v1/events/{free}/register"), &alice).await;
    let response = post_auth(&app, &format!("/api/v1/events/{paid}/register"), &alice).await;
    let paid_registration = body_json(response).await["registration_id"]
        .as_i64()
        .unwrap();

    let mine = body_json(get_auth(&app, "/api/v1/events/user-events", &alice).await).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    let by_event = |id: i64| {
        mine.iter()
            .find(|r| r["event_id"] == id)
            .expect("registration listed")
            .clone()
    };
    assert_eq!(by_event(free)["status"], "approved");
    assert!(by_event(free)["paid_at"].is_string());
    assert_eq!(by_event(free)["can_cancel"], true);
    assert_eq!(by_event(paid)["status"], "awaiting_payment");
    assert!(by_event(paid)["paid_at"].is_null());

    // The organizer confirms payment.
    let uri = format!("/api/v1/registrations/{paid_registration}/status");
    let response = patch_json_auth(&app, &uri, json!({ "status": "approved" }), &alice).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = patch_json_auth(&app, &uri, json!({ "status": "approved" }), &org).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Registration status updated to approved successfully"
    );

    let listed = body_json(
        get_auth(&app, &format!("/api/v1/registrations/event/{paid}"), &org).await,
    )
    .await;
    assert_eq!(listed[0]["status"], "approved");
    assert!(listed[0]["paid_at"].is_string());
    assert_eq!(listed[0]["user_name"], "Alice");
    assert_eq!(listed[0]["user_email"], "alice@example.com");

    let all = body_json(get_auth(&app, "/api/v1/registrations/organizer", &org).await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let response = get_auth(&app, &format!("/api/v1/registrations/event/{paid}"), &alice).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_rejection_frees_the_seat_and_is_final() {
    let app = common::build_test_app();
    let org = register_user(&app, "Org").await;
    let alice = register_user(&app, "Alice").await;
    let event_id = create_event(&app, &org, 1, Some(10.0)).await;

    let response = post_auth(&app, &format!("/api/v1/events/{event_id}/register"), &alice).await;
    let registration_id = body_json(response).await["registration_id"]
        .as_i64()
        .unwrap();
    let uri = format!("/api/v1/registrations/{registration_id}/status");

    let response = patch_json_auth(&app, &uri, json!({ "status": "rejected" }), &org).await;
    assert_eq!(response.status(), StatusCode::OK);

    let detail = body_json(get(&app, &format!("/api/v1/events/{event_id}")).await).await;
    assert_eq!(detail["remaining_seats"], 1);
    assert_eq!(detail["status"], "open");

    let response = patch_json_auth(&app, &uri, json!({ "status": "approved" }), &org).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = post_auth(
        &app,
        &format!("/api/v1/registrations/{registration_id}/cancel"),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await["error"],
        "This registration cannot be cancelled"
    );
}

#[tokio::test]
async fn test_only_owner_may_cancel() {
    let app = common::build_test_app();
    let org = register_user(&app, "Org").await;
    let alice = register_user(&app, "Alice").await;
    let event_id = create_event(&app, &org, 3, None).await;

    let response = post_auth(&app, &format!("/api/v1/events/{event_id}/register"), &alice).await;
    let registration_id = body_json(response).await["registration_id"]
        .as_i64()
        .unwrap();

    let response = post_auth(
        &app,
        &format!("/api/v1/registrations/{registration_id}/cancel"),
        &org,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
