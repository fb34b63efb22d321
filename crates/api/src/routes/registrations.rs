use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::registrations;
use crate::state::AppState;

/// Routes mounted at `/registrations`.
///
/// ```text
/// GET    /organizer                         -> list_for_organizer
/// GET    /event/{event_id}                  -> list_for_event
/// POST   /{id}/cancel                       -> cancel
/// PATCH  /{id}/status                       -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/organizer", get(registrations::list_for_organizer))
        .route("/event/{event_id}", get(registrations::list_for_event))
        .route("/{id}/cancel", post(registrations::cancel))
        .route("/{id}/status", patch(registrations::update_status))
}
