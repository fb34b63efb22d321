//! Route definitions for the `/events` resource.
//!
//! Registering for an event lives here as `/{id}/register`; managing an
//! existing registration lives under `/registrations`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                                  -> list
/// POST   /                                  -> create
/// GET    /user-events                       -> user_events
/// GET    /organized                         -> organized
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// PATCH  /{id}/status                       -> update_status
/// POST   /{id}/register                     -> register
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list).post(events::create))
        .route("/user-events", get(events::user_events))
        .route("/organized", get(events::organized))
        .route(
            "/{id}",
            get(events::get_by_id)
                .put(events::update)
                .delete(events::delete),
        )
        .route("/{id}/status", patch(events::update_status))
        .route("/{id}/register", post(events::register))
}
