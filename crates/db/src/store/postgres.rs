//! [`Store`] backed by PostgreSQL through the repositories.

use async_trait::async_trait;
use eventsync_core::status::{EventStatus, RegistrationStatus};
use eventsync_core::types::{DbId, Timestamp};

use super::{
    EventStore, FriendshipStore, RegistrationStore, SeatRelease, SeatReservation, StatusRequest,
    Store, StoreResult, UserStore,
};
use crate::models::event::{CreateEvent, Event, UpdateEvent};
use crate::models::friendship::Friendship;
use crate::models::registration::Registration;
use crate::models::user::{CreateUser, User};
use crate::repositories::{EventRepo, FriendshipRepo, RegistrationRepo, UserRepo};
use crate::DbPool;

/// PostgreSQL store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_users_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<User>> {
        Ok(UserRepo::find_by_ids(&self.pool, ids).await?)
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn create_event(&self, organizer_id: DbId, input: &CreateEvent) -> StoreResult<Event> {
        Ok(EventRepo::create(&self.pool, organizer_id, input).await?)
    }

    async fn find_event(&self, id: DbId) -> StoreResult<Option<Event>> {
        Ok(EventRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        Ok(EventRepo::list(&self.pool).await?)
    }

    async fn list_events_by_organizer(&self, organizer_id: DbId) -> StoreResult<Vec<Event>> {
        Ok(EventRepo::list_by_organizer(&self.pool, organizer_id).await?)
    }

    async fn list_events_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<Event>> {
        Ok(EventRepo::list_by_ids(&self.pool, ids).await?)
    }

    async fn add_participant(&self, event_id: DbId, user_id: DbId) -> StoreResult<bool> {
        Ok(EventRepo::add_participant(&self.pool, event_id, user_id).await?)
    }

    async fn remove_participant(&self, event_id: DbId, user_id: DbId) -> StoreResult<bool> {
        Ok(EventRepo::remove_participant(&self.pool, event_id, user_id).await?)
    }

    async fn request_event_status(
        &self,
        id: DbId,
        requested: EventStatus,
    ) -> StoreResult<StatusRequest> {
        Ok(EventRepo::request_status(&self.pool, id, requested).await?)
    }

    async fn update_event(&self, id: DbId, input: &UpdateEvent) -> StoreResult<bool> {
        Ok(EventRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_event(&self, id: DbId) -> StoreResult<bool> {
        Ok(EventRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl RegistrationStore for PgStore {
    async fn create_registration(
        &self,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
    ) -> StoreResult<Registration> {
        Ok(RegistrationRepo::create(&self.pool, user_id, event_id, status).await?)
    }

    async fn find_registration(&self, id: DbId) -> StoreResult<Option<Registration>> {
        Ok(RegistrationRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_registrations_by_user(&self, user_id: DbId) -> StoreResult<Vec<Registration>> {
        Ok(RegistrationRepo::list_by_user(&self.pool, user_id).await?)
    }

    async fn list_registrations_by_event(
        &self,
        event_id: DbId,
    ) -> StoreResult<Vec<Registration>> {
        Ok(RegistrationRepo::list_by_event(&self.pool, event_id).await?)
    }

    async fn find_active_registration(
        &self,
        user_id: DbId,
        event_id: DbId,
    ) -> StoreResult<Option<Registration>> {
        Ok(RegistrationRepo::find_active(&self.pool, user_id, event_id).await?)
    }

    async fn transition_registration_status(
        &self,
        id: DbId,
        from: RegistrationStatus,
        to: RegistrationStatus,
        paid_at: Option<Timestamp>,
    ) -> StoreResult<bool> {
        Ok(RegistrationRepo::transition_status(&self.pool, id, from, to, paid_at).await?)
    }

    async fn reserve_seat(
        &self,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
        now: Timestamp,
    ) -> StoreResult<SeatReservation> {
        Ok(RegistrationRepo::reserve_seat(&self.pool, user_id, event_id, status, now).await?)
    }

    async fn release_seat(
        &self,
        id: DbId,
        allowed_from: &[RegistrationStatus],
        to: RegistrationStatus,
    ) -> StoreResult<SeatRelease> {
        Ok(RegistrationRepo::release_seat(&self.pool, id, allowed_from, to).await?)
    }
}

#[async_trait]
impl FriendshipStore for PgStore {
    async fn create_friend_request(
        &self,
        requester_id: DbId,
        recipient_id: DbId,
    ) -> StoreResult<Friendship> {
        Ok(FriendshipRepo::create_request(&self.pool, requester_id, recipient_id).await?)
    }

    async fn find_friendship(&self, id: DbId) -> StoreResult<Option<Friendship>> {
        Ok(FriendshipRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_friendship_between(
        &self,
        a: DbId,
        b: DbId,
    ) -> StoreResult<Option<Friendship>> {
        Ok(FriendshipRepo::find_between(&self.pool, a, b).await?)
    }

    async fn accept_friendship(&self, id: DbId) -> StoreResult<bool> {
        Ok(FriendshipRepo::accept(&self.pool, id).await?)
    }

    async fn are_friends(&self, a: DbId, b: DbId) -> StoreResult<bool> {
        Ok(FriendshipRepo::are_friends(&self.pool, a, b).await?)
    }

    async fn list_pending_requests(&self, user_id: DbId) -> StoreResult<Vec<Friendship>> {
        Ok(FriendshipRepo::list_pending_received(&self.pool, user_id).await?)
    }

    async fn list_friend_ids(&self, user_id: DbId) -> StoreResult<Vec<DbId>> {
        Ok(FriendshipRepo::friend_ids(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
