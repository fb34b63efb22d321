use axum::routing::{get, post};
use axum::Router;

use crate::handlers::friends;
use crate::state::AppState;

/// Routes mounted at `/friends`.
///
/// ```text
/// GET    /                                  -> list
/// GET    /requests                          -> list_requests
/// POST   /requests/{id}/accept              -> accept
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(friends::list))
        .route("/requests", get(friends::list_requests))
        .route("/requests/{id}/accept", post(friends::accept))
}
