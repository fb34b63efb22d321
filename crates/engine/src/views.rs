//! Read models returned by the services. Serialized as-is at the HTTP boundary.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use eventsync_core::status::{EventStatus, RegistrationStatus};
use eventsync_core::types::{DbId, Timestamp};
use eventsync_db::models::event::Event;
use eventsync_db::models::registration::Registration;
use eventsync_db::models::user::{User, UserPublic};

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizerInfo {
    pub id: DbId,
    pub name: String,
    pub rating: f64,
}

impl From<&Event> for OrganizerInfo {
    fn from(event: &Event) -> Self {
        Self {
            id: event.organizer_id,
            name: event.organizer_name.clone(),
            rating: event.organizer_rating,
        }
    }
}

/// One row of an event listing.
#[derive(Debug, Clone, Serialize)]
pub struct EventSummary {
    pub id: DbId,
    pub title: String,
    pub banner: String,
    pub event_date: NaiveDate,
    pub price: Option<f64>,
    pub remaining_seats: i64,
    pub organizer: OrganizerInfo,
    pub category: String,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            banner: event.banner.clone(),
            event_date: event.event_date,
            price: event.price,
            remaining_seats: event.remaining_seats(),
            organizer: OrganizerInfo::from(event),
            category: event.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantInfo {
    pub id: DbId,
    pub name: String,
    pub city: String,
    /// Whether the viewer and this participant are friends.
    pub is_friend: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    pub id: DbId,
    pub title: String,
    pub banner: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    pub price: Option<f64>,
    pub remaining_seats: i64,
    pub capacity: i32,
    pub organizer: OrganizerInfo,
    pub category: String,
    pub description: String,
    pub location: String,
    pub rules: Vec<String>,
    pub status: EventStatus,
    pub participants: Vec<ParticipantInfo>,
}

impl EventDetail {
    pub fn new(event: &Event, participants: Vec<ParticipantInfo>) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            banner: event.banner.clone(),
            event_date: event.event_date,
            event_time: event.event_time,
            price: event.price,
            remaining_seats: event.remaining_seats(),
            capacity: event.capacity,
            organizer: OrganizerInfo::from(event),
            category: event.category.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            rules: event.rules.clone(),
            status: event.status,
            participants,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedEvent {
    pub message: String,
    pub event_id: DbId,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationReceipt {
    pub message: String,
    pub registration_id: DbId,
}

/// A registration as seen by the user who made it.
#[derive(Debug, Clone, Serialize)]
pub struct UserRegistration {
    pub id: DbId,
    pub event_id: DbId,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub event_banner: String,
    pub status: RegistrationStatus,
    pub registered_at: Timestamp,
    pub paid_at: Option<Timestamp>,
    pub can_cancel: bool,
}

impl UserRegistration {
    pub fn new(registration: &Registration, event: &Event) -> Self {
        Self {
            id: registration.id,
            event_id: event.id,
            event_name: event.title.clone(),
            event_date: event.event_date,
            event_banner: event.banner.clone(),
            status: registration.status,
            registered_at: registration.registered_at,
            paid_at: registration.paid_at,
            can_cancel: registration.status.is_cancellable(),
        }
    }
}

/// A registration as seen by the event organizer.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationWithUser {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub user_email: String,
    pub user_city: String,
    pub status: RegistrationStatus,
    pub registered_at: Timestamp,
    pub paid_at: Option<Timestamp>,
}

impl RegistrationWithUser {
    pub fn new(registration: &Registration, user: &User) -> Self {
        Self {
            id: registration.id,
            event_id: registration.event_id,
            user_id: user.id,
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            user_city: user.city.clone(),
            status: registration.status,
            registered_at: registration.registered_at,
            paid_at: registration.paid_at,
        }
    }
}

/// A pending friend request addressed to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct FriendRequestView {
    pub id: DbId,
    pub requester: UserPublic,
    pub created_at: Timestamp,
}
