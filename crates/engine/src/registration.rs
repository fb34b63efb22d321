//! Registration engine: seat reservation, cancellation and organizer-driven
//! status changes.
//!
//! Cheap pre-checks run against a plain read so the common failures are
//! reported without opening a transaction. The store re-verifies everything
//! inside [`RegistrationStore::reserve_seat`] and
//! [`RegistrationStore::release_seat`], which are the only writers of the
//! participant set on these paths.
//!
//! [`RegistrationStore::reserve_seat`]: eventsync_db::RegistrationStore::reserve_seat
//! [`RegistrationStore::release_seat`]: eventsync_db::RegistrationStore::release_seat

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use eventsync_core::registration::{
    approval_confirms_payment, classify_change, initial_status, StatusChange, ACTIVE_STATUSES,
};
use eventsync_core::status::{EventStatus, RegistrationStatus};
use eventsync_core::types::DbId;
use eventsync_db::models::event::Event;
use eventsync_db::models::registration::Registration;
use eventsync_db::{SeatRelease, SeatReservation, Store};

use crate::error::{EngineError, EngineResult};
use crate::views::{MessageResponse, RegistrationReceipt, RegistrationWithUser, UserRegistration};

/// Statuses the owner may cancel from.
const CANCELLABLE: &[RegistrationStatus] = &[
    RegistrationStatus::AwaitingPayment,
    RegistrationStatus::Approved,
];

#[derive(Clone)]
pub struct RegistrationEngine {
    store: Arc<dyn Store>,
}

impl RegistrationEngine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Register `user_id` for `event_id`.
    ///
    /// Free events are approved at once with the payment stamped; paid events
    /// wait for payment.
    pub async fn register_for_event(
        &self,
        event_id: DbId,
        user_id: DbId,
    ) -> EngineResult<RegistrationReceipt> {
        let event = self
            .store
            .find_event(event_id)
            .await?
            .ok_or_else(|| EngineError::event_not_found(event_id))?;

        if event.status == EventStatus::Closed {
            return Err(EngineError::EventClosed);
        }
        if event.status == EventStatus::Full || event.remaining_seats() <= 0 {
            tracing::debug!(
                event_id,
                capacity = event.capacity,
                participants = event.registered_users.len(),
                "Registration refused, event full"
            );
            return Err(EngineError::EventFull);
        }
        if self
            .store
            .find_active_registration(user_id, event_id)
            .await?
            .is_some()
        {
            return Err(EngineError::AlreadyRegistered);
        }

        let status = initial_status(event.price);
        let outcome = self
            .store
            .reserve_seat(user_id, event_id, status, Utc::now())
            .await?;

        let registration = match outcome {
            SeatReservation::Reserved(registration) => registration,
            SeatReservation::EventNotFound => return Err(EngineError::event_not_found(event_id)),
            SeatReservation::EventClosed => return Err(EngineError::EventClosed),
            SeatReservation::EventFull => return Err(EngineError::EventFull),
            SeatReservation::AlreadyRegistered => return Err(EngineError::AlreadyRegistered),
        };

        tracing::info!(
            event_id,
            user_id,
            registration_id = registration.id,
            status = %registration.status,
            "Registered for event"
        );

        Ok(RegistrationReceipt {
            message: "Registration successful".to_string(),
            registration_id: registration.id,
        })
    }

    /// Cancel the caller's own registration and free the seat.
    pub async fn cancel_registration(
        &self,
        registration_id: DbId,
        user_id: DbId,
    ) -> EngineResult<MessageResponse> {
        let registration = self.load_registration(registration_id).await?;

        if registration.user_id != user_id {
            return Err(EngineError::Forbidden);
        }
        if !registration.status.is_cancellable() {
            return Err(EngineError::CannotCancel {
                status: registration.status,
            });
        }

        match self
            .store
            .release_seat(registration_id, CANCELLABLE, RegistrationStatus::Cancelled)
            .await?
        {
            SeatRelease::Released(_) => {}
            SeatRelease::NotFound => {
                return Err(EngineError::registration_not_found(registration_id))
            }
            SeatRelease::NotActive(status) => return Err(EngineError::CannotCancel { status }),
        }

        tracing::info!(
            registration_id,
            user_id,
            event_id = registration.event_id,
            "Registration cancelled"
        );
        Ok(MessageResponse::new("Registration cancelled successfully"))
    }

    /// Change a registration's status on behalf of the event organizer.
    ///
    /// Moving into `Rejected` or `Cancelled` frees the seat. Terminal
    /// registrations cannot be revived. Every other change is a
    /// compare-and-set against the status read here, so a cancellation that
    /// lands in between is never overwritten. Approving a paid registration
    /// stamps the payment time once.
    pub async fn update_registration_status(
        &self,
        registration_id: DbId,
        new_status: RegistrationStatus,
        acting_user_id: DbId,
    ) -> EngineResult<MessageResponse> {
        let registration = self.load_registration(registration_id).await?;
        let event = self
            .store
            .find_event(registration.event_id)
            .await?
            .ok_or_else(|| EngineError::event_not_found(registration.event_id))?;

        if event.organizer_id != acting_user_id {
            return Err(EngineError::Forbidden);
        }

        let change =
            classify_change(registration.status, new_status).map_err(EngineError::InvalidState)?;
        match change {
            StatusChange::Unchanged | StatusChange::Update => {
                let paid_at = approval_confirms_payment(new_status, event.price).then(Utc::now);
                let moved = self
                    .store
                    .transition_registration_status(
                        registration_id,
                        registration.status,
                        new_status,
                        paid_at,
                    )
                    .await?;
                if !moved {
                    let current = self.load_registration(registration_id).await?.status;
                    return Err(EngineError::InvalidState(format!(
                        "Registration changed to {current} in the meantime; status not updated"
                    )));
                }
            }
            StatusChange::Release => {
                match self
                    .store
                    .release_seat(registration_id, ACTIVE_STATUSES, new_status)
                    .await?
                {
                    SeatRelease::Released(_) => {}
                    SeatRelease::NotFound => {
                        return Err(EngineError::registration_not_found(registration_id))
                    }
                    SeatRelease::NotActive(current) => {
                        return Err(EngineError::InvalidState(format!(
                            "Registration is {current} and can no longer change status"
                        )))
                    }
                }
            }
        }

        tracing::info!(
            registration_id,
            event_id = event.id,
            from = %registration.status,
            to = %new_status,
            "Registration status updated"
        );
        Ok(MessageResponse::new(format!(
            "Registration status updated to {new_status} successfully"
        )))
    }

    /// Active registrations of one event, with the registrant's contact
    /// details. Organizer only.
    pub async fn list_event_registrations(
        &self,
        event_id: DbId,
        caller: DbId,
    ) -> EngineResult<Vec<RegistrationWithUser>> {
        let event = self
            .store
            .find_event(event_id)
            .await?
            .ok_or_else(|| EngineError::event_not_found(event_id))?;
        if event.organizer_id != caller {
            return Err(EngineError::Forbidden);
        }

        let registrations = self.store.list_registrations_by_event(event_id).await?;
        self.attach_users(registrations).await
    }

    /// Active registrations across every event organized by `organizer_id`.
    pub async fn list_organizer_registrations(
        &self,
        organizer_id: DbId,
    ) -> EngineResult<Vec<RegistrationWithUser>> {
        let events = self.store.list_events_by_organizer(organizer_id).await?;

        let mut registrations = Vec::new();
        for event in &events {
            registrations.extend(self.store.list_registrations_by_event(event.id).await?);
        }
        self.attach_users(registrations).await
    }

    /// Every registration the user made. Registrations whose event was
    /// deleted are skipped.
    pub async fn list_user_registrations(
        &self,
        user_id: DbId,
    ) -> EngineResult<Vec<UserRegistration>> {
        let registrations = self.store.list_registrations_by_user(user_id).await?;
        if registrations.is_empty() {
            return Ok(Vec::new());
        }

        let mut event_ids: Vec<DbId> = registrations.iter().map(|r| r.event_id).collect();
        event_ids.sort_unstable();
        event_ids.dedup();
        let events: HashMap<DbId, Event> = self
            .store
            .list_events_by_ids(&event_ids)
            .await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect();

        Ok(registrations
            .iter()
            .filter_map(|r| {
                events
                    .get(&r.event_id)
                    .map(|event| UserRegistration::new(r, event))
            })
            .collect())
    }

    async fn load_registration(&self, id: DbId) -> EngineResult<Registration> {
        self.store
            .find_registration(id)
            .await?
            .ok_or_else(|| EngineError::registration_not_found(id))
    }

    /// Join registrations with their users, dropping any whose user is gone.
    async fn attach_users(
        &self,
        registrations: Vec<Registration>,
    ) -> EngineResult<Vec<RegistrationWithUser>> {
        let user_ids: Vec<DbId> = registrations.iter().map(|r| r.user_id).collect();
        let users: HashMap<DbId, _> = self
            .store
            .find_users_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(registrations
            .iter()
            .filter_map(|r| {
                users
                    .get(&r.user_id)
                    .map(|user| RegistrationWithUser::new(r, user))
            })
            .collect())
    }
}
