//! Storage traits the engine is written against.
//!
//! The traits are object safe so the engine can hold an `Arc<dyn Store>` and
//! stay unaware of the backend. [`postgres::PgStore`] delegates to the
//! repositories; [`memory::MemoryStore`] keeps everything behind one mutex.
//!
//! Method names carry their entity (`find_event`, `find_registration`) so
//! they do not collide on the combined [`Store`] trait object.

use async_trait::async_trait;
use eventsync_core::status::{EventStatus, RegistrationStatus};
use eventsync_core::types::{DbId, Timestamp};

use crate::models::event::{CreateEvent, Event, UpdateEvent};
use crate::models::friendship::Friendship;
use crate::models::registration::Registration;
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Failure of the storage backend itself, as opposed to a domain outcome.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("Duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::Duplicate(constraint);
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of [`RegistrationStore::reserve_seat`].
#[derive(Debug, Clone)]
pub enum SeatReservation {
    Reserved(Registration),
    EventNotFound,
    EventClosed,
    EventFull,
    AlreadyRegistered,
}

/// Outcome of [`EventStore::request_event_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusRequest {
    /// The status now stored. May differ from the one requested
    /// (closing an event with no seats left keeps it `Full`).
    Applied(EventStatus),
    /// The request contradicts the live seat count. Carries the reason.
    Refused(String),
    EventNotFound,
}

/// Outcome of [`RegistrationStore::release_seat`].
#[derive(Debug, Clone)]
pub enum SeatRelease {
    Released(Registration),
    NotFound,
    /// The registration's current status was not one the caller allowed.
    NotActive(RegistrationStatus),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the email is taken.
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Unknown ids are skipped.
    async fn find_users_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<User>>;
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_event(&self, organizer_id: DbId, input: &CreateEvent) -> StoreResult<Event>;
    async fn find_event(&self, id: DbId) -> StoreResult<Option<Event>>;
    /// Newest first.
    async fn list_events(&self) -> StoreResult<Vec<Event>>;
    async fn list_events_by_organizer(&self, organizer_id: DbId) -> StoreResult<Vec<Event>>;
    async fn list_events_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<Event>>;
    /// Idempotent set insert followed by a status recompute.
    async fn add_participant(&self, event_id: DbId, user_id: DbId) -> StoreResult<bool>;
    /// Idempotent set removal followed by a status recompute.
    async fn remove_participant(&self, event_id: DbId, user_id: DbId) -> StoreResult<bool>;
    /// Reconcile an organizer's requested status with the participant count
    /// and store the result, as one atomic step.
    async fn request_event_status(
        &self,
        id: DbId,
        requested: EventStatus,
    ) -> StoreResult<StatusRequest>;
    /// Returns whether any stored value changed.
    async fn update_event(&self, id: DbId, input: &UpdateEvent) -> StoreResult<bool>;
    /// Also removes the event's registrations.
    async fn delete_event(&self, id: DbId) -> StoreResult<bool>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn create_registration(
        &self,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
    ) -> StoreResult<Registration>;
    async fn find_registration(&self, id: DbId) -> StoreResult<Option<Registration>>;
    async fn list_registrations_by_user(&self, user_id: DbId) -> StoreResult<Vec<Registration>>;
    /// Active registrations only.
    async fn list_registrations_by_event(&self, event_id: DbId)
        -> StoreResult<Vec<Registration>>;
    async fn find_active_registration(
        &self,
        user_id: DbId,
        event_id: DbId,
    ) -> StoreResult<Option<Registration>>;
    /// Move a registration from `from` to `to` only if it is still in `from`.
    ///
    /// `paid_at` is written when given and no payment time is recorded yet.
    /// Returns `false` when the row is missing or its status moved on.
    async fn transition_registration_status(
        &self,
        id: DbId,
        from: RegistrationStatus,
        to: RegistrationStatus,
        paid_at: Option<Timestamp>,
    ) -> StoreResult<bool>;

    /// Check capacity and duplicates, insert the registration and take a
    /// seat, all as one atomic step.
    async fn reserve_seat(
        &self,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
        now: Timestamp,
    ) -> StoreResult<SeatReservation>;

    /// Move a registration whose status is in `allowed_from` to `to` and
    /// free its seat, as one atomic step.
    async fn release_seat(
        &self,
        id: DbId,
        allowed_from: &[RegistrationStatus],
        to: RegistrationStatus,
    ) -> StoreResult<SeatRelease>;
}

#[async_trait]
pub trait FriendshipStore: Send + Sync {
    /// Fails with [`StoreError::Duplicate`] when the pair already has an edge.
    async fn create_friend_request(
        &self,
        requester_id: DbId,
        recipient_id: DbId,
    ) -> StoreResult<Friendship>;
    async fn find_friendship(&self, id: DbId) -> StoreResult<Option<Friendship>>;
    /// The edge between two users in either direction.
    async fn find_friendship_between(&self, a: DbId, b: DbId)
        -> StoreResult<Option<Friendship>>;
    async fn accept_friendship(&self, id: DbId) -> StoreResult<bool>;
    async fn are_friends(&self, a: DbId, b: DbId) -> StoreResult<bool>;
    /// Pending requests received by `user_id`.
    async fn list_pending_requests(&self, user_id: DbId) -> StoreResult<Vec<Friendship>>;
    async fn list_friend_ids(&self, user_id: DbId) -> StoreResult<Vec<DbId>>;
}

/// Everything the engine needs from a backend.
#[async_trait]
pub trait Store: UserStore + EventStore + RegistrationStore + FriendshipStore {
    /// Verify the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
