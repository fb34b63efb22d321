//! Request handlers, one submodule per resource.
//!
//! Handlers parse path ids, validate bodies, and delegate to the services in
//! [`AppState`](crate::state::AppState). Errors are mapped via
//! [`AppError`](crate::error::AppError).

pub mod auth;
pub mod events;
pub mod friends;
pub mod registrations;
pub mod users;

use eventsync_core::error::CoreError;
use serde::Deserialize;

/// Body of the `PATCH .../status` endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Parse a status label sent by the client, rejecting unknown labels with 400.
pub(crate) fn parse_status<T>(
    label: &str,
    from_label: impl Fn(&str) -> Option<T>,
) -> Result<T, CoreError> {
    from_label(label).ok_or_else(|| CoreError::Validation(format!("Invalid status: {label}")))
}
