use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /me                                -> me
/// POST   /{user_id}/friend-request          -> send_friend_request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me))
        .route("/{user_id}/friend-request", post(users::send_friend_request))
}
