//! Handlers for the `/registrations` resource.

use axum::extract::{Path, State};
use axum::Json;
use eventsync_core::ids::parse_id;
use eventsync_core::status::RegistrationStatus;
use eventsync_engine::views::{MessageResponse, RegistrationWithUser};

use crate::error::AppResult;
use crate::handlers::{parse_status, StatusUpdateRequest};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/registrations/organizer
///
/// Active registrations across every event the caller organizes.
pub async fn list_for_organizer(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<RegistrationWithUser>>> {
    Ok(Json(
        state
            .registrations
            .list_organizer_registrations(user.user_id)
            .await?,
    ))
}

/// GET /api/v1/registrations/event/{event_id}
pub async fn list_for_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_event_id): Path<String>,
) -> AppResult<Json<Vec<RegistrationWithUser>>> {
    let event_id = parse_id("Event", &raw_event_id)?;
    Ok(Json(
        state
            .registrations
            .list_event_registrations(event_id, user.user_id)
            .await?,
    ))
}

/// POST /api/v1/registrations/{id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id("Registration", &raw_id)?;
    Ok(Json(
        state
            .registrations
            .cancel_registration(id, user.user_id)
            .await?,
    ))
}

/// PATCH /api/v1/registrations/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    Json(input): Json<StatusUpdateRequest>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id("Registration", &raw_id)?;
    let status = parse_status(&input.status, RegistrationStatus::from_label)?;
    Ok(Json(
        state
            .registrations
            .update_registration_status(id, status, user.user_id)
            .await?,
    ))
}
