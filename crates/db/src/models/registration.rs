//! Registration entity model.

use serde::Serialize;
use sqlx::FromRow;
use eventsync_core::status::RegistrationStatus;
use eventsync_core::types::{DbId, Timestamp};

/// A row from the `registrations` table.
///
/// `status_id` is decoded into [`RegistrationStatus`] while reading; an
/// unknown id fails the row decode.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: DbId,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: RegistrationStatus,
    pub registered_at: Timestamp,
    /// Set when the registration is paid for, or at once for free events.
    pub paid_at: Option<Timestamp>,
}
