//! Registration lifecycle rules.
//!
//! A registration is *active* unless it was cancelled or rejected. At most one
//! active registration may exist per (user, event) pair, and every active
//! registration holds one seat in the event's participant set.

use crate::capacity::is_free;
use crate::status::RegistrationStatus;

/// Statuses that hold a seat.
pub const ACTIVE_STATUSES: &[RegistrationStatus] = &[
    RegistrationStatus::AwaitingPayment,
    RegistrationStatus::Approved,
    RegistrationStatus::Finalized,
];

/// Statuses that released their seat and end the registration.
pub const TERMINAL_STATUSES: &[RegistrationStatus] =
    &[RegistrationStatus::Rejected, RegistrationStatus::Cancelled];

impl RegistrationStatus {
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    pub fn is_terminal(self) -> bool {
        TERMINAL_STATUSES.contains(&self)
    }

    /// Only registrations still awaiting payment or approved may be cancelled
    /// by their owner.
    pub fn is_cancellable(self) -> bool {
        matches!(
            self,
            RegistrationStatus::AwaitingPayment | RegistrationStatus::Approved
        )
    }
}

/// Status assigned at registration time: free events are approved outright,
/// paid events wait for payment.
pub fn initial_status(price: Option<f64>) -> RegistrationStatus {
    if is_free(price) {
        RegistrationStatus::Approved
    } else {
        RegistrationStatus::AwaitingPayment
    }
}

/// Whether an organizer approval marks the payment as confirmed.
pub fn approval_confirms_payment(status: RegistrationStatus, price: Option<f64>) -> bool {
    status == RegistrationStatus::Approved && price.is_some_and(|p| p > 0.0)
}

/// What an organizer-driven status change does to the participant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    /// Same status as before; nothing to write.
    Unchanged,
    /// Move between active statuses; the seat is kept.
    Update,
    /// Move from an active status into a terminal one; the seat is released.
    Release,
}

/// Classify a status change requested by the event organizer.
///
/// Terminal registrations cannot be revived; the user registers again instead.
pub fn classify_change(
    from: RegistrationStatus,
    to: RegistrationStatus,
) -> Result<StatusChange, String> {
    if from == to {
        return Ok(StatusChange::Unchanged);
    }
    if from.is_terminal() {
        return Err(format!(
            "Registration is {from} and can no longer change status"
        ));
    }
    if to.is_terminal() {
        Ok(StatusChange::Release)
    } else {
        Ok(StatusChange::Update)
    }
}
