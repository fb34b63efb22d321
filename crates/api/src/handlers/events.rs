//! Handlers for the `/events` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;
use eventsync_core::ids::parse_id;
use eventsync_core::status::EventStatus;
use eventsync_db::models::event::{CreateEvent, UpdateEvent};
use eventsync_engine::views::{
    CreatedEvent, EventDetail, EventSummary, MessageResponse, RegistrationReceipt,
    UserRegistration,
};

use crate::error::AppResult;
use crate::handlers::{parse_status, StatusUpdateRequest};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::state::AppState;

/// GET /api/v1/events
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<EventSummary>>> {
    Ok(Json(state.events.list_events().await?))
}

/// POST /api/v1/events
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<CreatedEvent>)> {
    input.validate()?;
    let created = state.events.create_event(user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/events/user-events
///
/// The caller's own registrations, newest first.
pub async fn user_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<UserRegistration>>> {
    Ok(Json(
        state
            .registrations
            .list_user_registrations(user.user_id)
            .await?,
    ))
}

/// GET /api/v1/events/organized
pub async fn organized(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<EventSummary>>> {
    Ok(Json(state.events.list_organized_events(user.user_id).await?))
}

/// GET /api/v1/events/{id}
///
/// Public. With a valid token, participants who are the caller's friends are flagged.
pub async fn get_by_id(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<EventDetail>> {
    let id = parse_id("Event", &raw_id)?;
    Ok(Json(state.events.get_event_detail(id, viewer).await?))
}

/// PUT /api/v1/events/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id("Event", &raw_id)?;
    input.validate()?;
    Ok(Json(state.events.update_event(id, &input, user.user_id).await?))
}

/// DELETE /api/v1/events/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id("Event", &raw_id)?;
    Ok(Json(state.events.delete_event(id, user.user_id).await?))
}

/// PATCH /api/v1/events/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    Json(input): Json<StatusUpdateRequest>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id("Event", &raw_id)?;
    let status = parse_status(&input.status, EventStatus::from_label)?;
    Ok(Json(
        state
            .events
            .update_event_status(id, status, user.user_id)
            .await?,
    ))
}

/// POST /api/v1/events/{id}/register
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<(StatusCode, Json<RegistrationReceipt>)> {
    let id = parse_id("Event", &raw_id)?;
    let receipt = state
        .registrations
        .register_for_event(id, user.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
