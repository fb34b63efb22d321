//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eventsync_core::error::CoreError;
use eventsync_core::ids::parse_id;
use eventsync_db::models::user::UserInfo;
use eventsync_engine::views::MessageResponse;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<UserInfo>> {
    let found = state
        .store
        .find_user(user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(UserInfo::from(&found)))
}

/// POST /api/v1/users/{user_id}/friend-request
pub async fn send_friend_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let target = parse_id("User", &raw_id)?;
    let result = state
        .friends
        .send_friend_request(user.user_id, target)
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}
