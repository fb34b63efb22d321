//! Handlers for the `/friends` resource.

use axum::extract::{Path, State};
use axum::Json;
use eventsync_core::ids::parse_id;
use eventsync_db::models::user::UserPublic;
use eventsync_engine::views::{FriendRequestView, MessageResponse};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/friends
pub async fn list(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Vec<UserPublic>>> {
    Ok(Json(state.friends.list_friends(user.user_id).await?))
}

/// GET /api/v1/friends/requests
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<FriendRequestView>>> {
    Ok(Json(state.friends.list_pending_requests(user.user_id).await?))
}

/// POST /api/v1/friends/requests/{id}/accept
pub async fn accept(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id("Friend request", &raw_id)?;
    Ok(Json(state.friends.accept_friend_request(id, user.user_id).await?))
}
