//! In-memory [`Store`] used by tests and the `memory` backend.
//!
//! All collections live behind one `tokio::sync::Mutex`, so every method is a
//! single critical section and the seat primitives are atomic for free.
//! Unique constraints of the relational schema are mirrored and reported as
//! [`StoreError::Duplicate`] with the same constraint names.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use eventsync_core::capacity::{derive_status, reconcile_requested_status};
use eventsync_core::status::{EventStatus, FriendshipStatus, RegistrationStatus};
use eventsync_core::types::{DbId, Timestamp};
use tokio::sync::Mutex;

use super::{
    EventStore, FriendshipStore, RegistrationStore, SeatRelease, SeatReservation, StatusRequest,
    Store, StoreError, StoreResult, UserStore,
};
use crate::models::event::{CreateEvent, Event, UpdateEvent};
use crate::models::friendship::Friendship;
use crate::models::registration::Registration;
use crate::models::user::{CreateUser, User};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    events: BTreeMap<DbId, Event>,
    registrations: BTreeMap<DbId, Registration>,
    friendships: BTreeMap<DbId, Friendship>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn active_registration(&self, user_id: DbId, event_id: DbId) -> Option<&Registration> {
        self.registrations
            .values()
            .find(|r| r.user_id == user_id && r.event_id == event_id && r.status.is_active())
    }

    fn insert_registration(
        &mut self,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
        paid_at: Option<Timestamp>,
    ) -> StoreResult<Registration> {
        if self.active_registration(user_id, event_id).is_some() {
            return Err(StoreError::Duplicate(
                "uq_registrations_active_user_event".to_string(),
            ));
        }
        let registration = Registration {
            id: self.allocate_id(),
            user_id,
            event_id,
            status,
            registered_at: Utc::now(),
            paid_at,
        };
        self.registrations
            .insert(registration.id, registration.clone());
        Ok(registration)
    }

    /// Insert into the participant set and recompute the status.
    fn add_participant(&mut self, event_id: DbId, user_id: DbId) -> bool {
        let Some(event) = self.events.get_mut(&event_id) else {
            return false;
        };
        let inserted = !event.has_participant(user_id);
        if inserted {
            event.registered_users.push(user_id);
        }
        event.status = derive_status(event.status, event.capacity, event.registered_users.len());
        inserted
    }

    /// Remove from the participant set and recompute the status.
    fn remove_participant(&mut self, event_id: DbId, user_id: DbId) -> bool {
        let Some(event) = self.events.get_mut(&event_id) else {
            return false;
        };
        let removed = event.has_participant(user_id);
        event.registered_users.retain(|id| *id != user_id);
        event.status = derive_status(event.status, event.capacity, event.registered_users.len());
        removed
    }
}

fn newest_first(events: &mut [Event]) {
    events.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
}

/// In-memory store. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::Duplicate("uq_users_email".to_string()));
        }
        let user = User {
            id: state.allocate_id(),
            name: input.name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            city: input.city.clone(),
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_users_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn create_event(&self, organizer_id: DbId, input: &CreateEvent) -> StoreResult<Event> {
        let mut state = self.state.lock().await;
        let event = Event {
            id: state.allocate_id(),
            title: input.title.clone(),
            banner: input.banner.clone(),
            event_date: input.event_date,
            event_time: input.event_time,
            price: input.price,
            capacity: input.capacity,
            category: input.category.clone(),
            description: input.description.clone(),
            location: input.location.clone(),
            rules: input.rules.clone(),
            organizer_id,
            organizer_name: input.organizer_name.clone(),
            organizer_rating: input.organizer_rating,
            status: EventStatus::Open,
            registered_users: Vec::new(),
            created_at: Utc::now(),
        };
        state.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_event(&self, id: DbId) -> StoreResult<Option<Event>> {
        Ok(self.state.lock().await.events.get(&id).cloned())
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self.state.lock().await.events.values().cloned().collect();
        newest_first(&mut events);
        Ok(events)
    }

    async fn list_events_by_organizer(&self, organizer_id: DbId) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .state
            .lock()
            .await
            .events
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .cloned()
            .collect();
        newest_first(&mut events);
        Ok(events)
    }

    async fn list_events_by_ids(&self, ids: &[DbId]) -> StoreResult<Vec<Event>> {
        let state = self.state.lock().await;
        Ok(state
            .events
            .values()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }

    async fn add_participant(&self, event_id: DbId, user_id: DbId) -> StoreResult<bool> {
        Ok(self.state.lock().await.add_participant(event_id, user_id))
    }

    async fn remove_participant(&self, event_id: DbId, user_id: DbId) -> StoreResult<bool> {
        Ok(self.state.lock().await.remove_participant(event_id, user_id))
    }

    async fn request_event_status(
        &self,
        id: DbId,
        requested: EventStatus,
    ) -> StoreResult<StatusRequest> {
        let mut state = self.state.lock().await;
        let Some(event) = state.events.get_mut(&id) else {
            return Ok(StatusRequest::EventNotFound);
        };
        Ok(
            match reconcile_requested_status(requested, event.capacity, event.registered_users.len())
            {
                Ok(status) => {
                    event.status = status;
                    StatusRequest::Applied(status)
                }
                Err(reason) => StatusRequest::Refused(reason),
            },
        )
    }

    async fn update_event(&self, id: DbId, input: &UpdateEvent) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let Some(event) = state.events.get_mut(&id) else {
            return Ok(false);
        };
        if !input.apply_to(event) {
            return Ok(false);
        }
        event.status = derive_status(event.status, event.capacity, event.registered_users.len());
        Ok(true)
    }

    async fn delete_event(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        if state.events.remove(&id).is_none() {
            return Ok(false);
        }
        state.registrations.retain(|_, r| r.event_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn create_registration(
        &self,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
    ) -> StoreResult<Registration> {
        self.state
            .lock()
            .await
            .insert_registration(user_id, event_id, status, None)
    }

    async fn find_registration(&self, id: DbId) -> StoreResult<Option<Registration>> {
        Ok(self.state.lock().await.registrations.get(&id).cloned())
    }

    async fn list_registrations_by_user(&self, user_id: DbId) -> StoreResult<Vec<Registration>> {
        let state = self.state.lock().await;
        let mut registrations: Vec<Registration> = state
            .registrations
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        registrations.sort_by(|a, b| (b.registered_at, b.id).cmp(&(a.registered_at, a.id)));
        Ok(registrations)
    }

    async fn list_registrations_by_event(
        &self,
        event_id: DbId,
    ) -> StoreResult<Vec<Registration>> {
        let state = self.state.lock().await;
        Ok(state
            .registrations
            .values()
            .filter(|r| r.event_id == event_id && r.status.is_active())
            .cloned()
            .collect())
    }

    async fn find_active_registration(
        &self,
        user_id: DbId,
        event_id: DbId,
    ) -> StoreResult<Option<Registration>> {
        let state = self.state.lock().await;
        Ok(state.active_registration(user_id, event_id).cloned())
    }

    async fn transition_registration_status(
        &self,
        id: DbId,
        from: RegistrationStatus,
        to: RegistrationStatus,
        paid_at: Option<Timestamp>,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.registrations.get_mut(&id) {
            Some(registration) if registration.status == from => {
                registration.status = to;
                if registration.paid_at.is_none() {
                    registration.paid_at = paid_at;
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn reserve_seat(
        &self,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
        now: Timestamp,
    ) -> StoreResult<SeatReservation> {
        let mut state = self.state.lock().await;

        let Some(event) = state.events.get(&event_id) else {
            return Ok(SeatReservation::EventNotFound);
        };
        if event.status == EventStatus::Closed {
            return Ok(SeatReservation::EventClosed);
        }
        if event.status == EventStatus::Full || event.remaining_seats() <= 0 {
            return Ok(SeatReservation::EventFull);
        }
        if state.active_registration(user_id, event_id).is_some() {
            return Ok(SeatReservation::AlreadyRegistered);
        }

        let paid_at = (status == RegistrationStatus::Approved).then_some(now);
        let registration = state.insert_registration(user_id, event_id, status, paid_at)?;
        state.add_participant(event_id, user_id);
        Ok(SeatReservation::Reserved(registration))
    }

    async fn release_seat(
        &self,
        id: DbId,
        allowed_from: &[RegistrationStatus],
        to: RegistrationStatus,
    ) -> StoreResult<SeatRelease> {
        let mut state = self.state.lock().await;

        let Some(registration) = state.registrations.get_mut(&id) else {
            return Ok(SeatRelease::NotFound);
        };
        if !allowed_from.contains(&registration.status) {
            return Ok(SeatRelease::NotActive(registration.status));
        }
        registration.status = to;
        let released = registration.clone();

        state.remove_participant(released.event_id, released.user_id);
        Ok(SeatRelease::Released(released))
    }
}

#[async_trait]
impl FriendshipStore for MemoryStore {
    async fn create_friend_request(
        &self,
        requester_id: DbId,
        recipient_id: DbId,
    ) -> StoreResult<Friendship> {
        let mut state = self.state.lock().await;
        let exists = state
            .friendships
            .values()
            .any(|f| f.involves(requester_id) && f.involves(recipient_id));
        if exists {
            return Err(StoreError::Duplicate("uq_friendships_pair".to_string()));
        }
        let friendship = Friendship {
            id: state.allocate_id(),
            requester_id,
            recipient_id,
            status: FriendshipStatus::Pending,
            created_at: Utc::now(),
        };
        state.friendships.insert(friendship.id, friendship.clone());
        Ok(friendship)
    }

    async fn find_friendship(&self, id: DbId) -> StoreResult<Option<Friendship>> {
        Ok(self.state.lock().await.friendships.get(&id).cloned())
    }

    async fn find_friendship_between(
        &self,
        a: DbId,
        b: DbId,
    ) -> StoreResult<Option<Friendship>> {
        let state = self.state.lock().await;
        Ok(state
            .friendships
            .values()
            .find(|f| f.involves(a) && f.involves(b))
            .cloned())
    }

    async fn accept_friendship(&self, id: DbId) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        match state.friendships.get_mut(&id) {
            Some(friendship) => {
                friendship.status = FriendshipStatus::Accepted;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn are_friends(&self, a: DbId, b: DbId) -> StoreResult<bool> {
        let state = self.state.lock().await;
        Ok(state.friendships.values().any(|f| {
            f.status == FriendshipStatus::Accepted && f.involves(a) && f.involves(b)
        }))
    }

    async fn list_pending_requests(&self, user_id: DbId) -> StoreResult<Vec<Friendship>> {
        let state = self.state.lock().await;
        let mut pending: Vec<Friendship> = state
            .friendships
            .values()
            .filter(|f| f.recipient_id == user_id && f.status == FriendshipStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(pending)
    }

    async fn list_friend_ids(&self, user_id: DbId) -> StoreResult<Vec<DbId>> {
        let state = self.state.lock().await;
        Ok(state
            .friendships
            .values()
            .filter(|f| f.status == FriendshipStatus::Accepted && f.involves(user_id))
            .map(|f| eventsync_core::friendship::other_party(f.requester_id, f.recipient_id, user_id))
            .collect())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
