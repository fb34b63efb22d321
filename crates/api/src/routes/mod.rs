pub mod auth;
pub mod events;
pub mod friends;
pub mod health;
pub mod registrations;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
///
/// /users/me                                        caller's profile
/// /users/{user_id}/friend-request                  send friend request (POST)
///
/// /friends                                         accepted friends
/// /friends/requests                                pending requests received
/// /friends/requests/{id}/accept                    accept (POST)
///
/// /events                                          list (public), create
/// /events/user-events                              caller's registrations
/// /events/organized                                events the caller organizes
/// /events/{id}                                     detail (optional auth), update, delete
/// /events/{id}/status                              set status (PATCH)
/// /events/{id}/register                            register for the event (POST)
///
/// /registrations/organizer                         registrations across caller's events
/// /registrations/event/{event_id}                  registrations of one event
/// /registrations/{id}/cancel                       cancel own registration (POST)
/// /registrations/{id}/status                       organizer status change (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/friends", friends::router())
        .nest("/events", events::router())
        .nest("/registrations", registrations::router())
}
