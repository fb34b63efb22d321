//! Event capacity rules.
//!
//! The participant set cached on an event is the source of truth for seat
//! math. [`EventStatus::Full`] is a pure function of capacity and participant
//! count, recomputed on every mutation via [`derive_status`].

use crate::status::EventStatus;

/// Seats still available. Negative when capacity was lowered below the
/// current participant count.
pub fn remaining_seats(capacity: i32, participants: usize) -> i64 {
    i64::from(capacity) - participants as i64
}

/// An event is free when it has no price or a price of zero.
pub fn is_free(price: Option<f64>) -> bool {
    match price {
        None => true,
        Some(p) => p == 0.0,
    }
}

/// Recompute an event's status after its participant set or capacity changed.
///
/// - no seats left: `Full`
/// - seats left and previously `Full`: `Open`
/// - otherwise the current status is kept (`Closed` stays closed)
pub fn derive_status(current: EventStatus, capacity: i32, participants: usize) -> EventStatus {
    if remaining_seats(capacity, participants) <= 0 {
        EventStatus::Full
    } else if current == EventStatus::Full {
        EventStatus::Open
    } else {
        current
    }
}

/// Resolve an organizer's requested status against the capacity invariant.
///
/// Returns the status to persist, or a human-readable reason when the request
/// would break `Full <=> no remaining seats`.
pub fn reconcile_requested_status(
    requested: EventStatus,
    capacity: i32,
    participants: usize,
) -> Result<EventStatus, String> {
    let no_seats = remaining_seats(capacity, participants) <= 0;
    match requested {
        EventStatus::Full if !no_seats => {
            Err("Event cannot be marked full while seats remain".to_string())
        }
        EventStatus::Open if no_seats => {
            Err("Event cannot be reopened while it has no remaining seats".to_string())
        }
        EventStatus::Closed if no_seats => Ok(EventStatus::Full),
        other => Ok(other),
    }
}
