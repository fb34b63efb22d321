//! Event entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use eventsync_core::capacity;
use eventsync_core::status::EventStatus;
use eventsync_core::types::{DbId, Timestamp};

/// Default organizer rating snapshot when the client does not send one.
pub const DEFAULT_ORGANIZER_RATING: f64 = 5.0;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub banner: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    /// `None` or `0.0` means the event is free.
    pub price: Option<f64>,
    pub capacity: i32,
    pub category: String,
    pub description: String,
    pub location: String,
    pub rules: Vec<String>,
    pub organizer_id: DbId,
    /// Organizer display name, snapshotted at creation.
    pub organizer_name: String,
    /// Organizer rating (0-5), snapshotted at creation.
    pub organizer_rating: f64,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: EventStatus,
    /// Ids of users holding an active registration, in registration order.
    pub registered_users: Vec<DbId>,
    pub created_at: Timestamp,
}

impl Event {
    /// Seats left, computed from the participant set.
    pub fn remaining_seats(&self) -> i64 {
        capacity::remaining_seats(self.capacity, self.registered_users.len())
    }

    pub fn is_free(&self) -> bool {
        capacity::is_free(self.price)
    }

    pub fn has_participant(&self, user_id: DbId) -> bool {
        self.registered_users.contains(&user_id)
    }
}

fn default_rating() -> f64 {
    DEFAULT_ORGANIZER_RATING
}

/// DTO for creating an event. The organizer id comes from the caller's identity.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[serde(default)]
    pub banner: String,
    pub event_date: NaiveDate,
    pub event_time: NaiveTime,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 1))]
    pub capacity: i32,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 300))]
    pub location: String,
    #[serde(default)]
    pub rules: Vec<String>,
    #[validate(length(min = 1, max = 100))]
    pub organizer_name: String,
    #[serde(default = "default_rating")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub organizer_rating: f64,
}

/// DTO for a partial event update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 3, max = 200))]
    pub title: Option<String>,
    pub banner: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<NaiveTime>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 300))]
    pub location: Option<String>,
    pub rules: Option<Vec<String>>,
}

impl UpdateEvent {
    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.banner.is_none()
            && self.event_date.is_none()
            && self.event_time.is_none()
            && self.price.is_none()
            && self.capacity.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.rules.is_none()
    }

    /// Apply the set fields to `event` in place. Returns whether anything changed.
    pub fn apply_to(&self, event: &mut Event) -> bool {
        let before = (
            event.title.clone(),
            event.banner.clone(),
            event.event_date,
            event.event_time,
            event.price,
            event.capacity,
            event.category.clone(),
            event.description.clone(),
            event.location.clone(),
            event.rules.clone(),
        );

        if let Some(v) = &self.title {
            event.title = v.clone();
        }
        if let Some(v) = &self.banner {
            event.banner = v.clone();
        }
        if let Some(v) = self.event_date {
            event.event_date = v;
        }
        if let Some(v) = self.event_time {
            event.event_time = v;
        }
        if let Some(v) = self.price {
            event.price = Some(v);
        }
        if let Some(v) = self.capacity {
            event.capacity = v;
        }
        if let Some(v) = &self.category {
            event.category = v.clone();
        }
        if let Some(v) = &self.description {
            event.description = v.clone();
        }
        if let Some(v) = &self.location {
            event.location = v.clone();
        }
        if let Some(v) = &self.rules {
            event.rules = v.clone();
        }

        before
            != (
                event.title.clone(),
                event.banner.clone(),
                event.event_date,
                event.event_time,
                event.price,
                event.capacity,
                event.category.clone(),
                event.description.clone(),
                event.location.clone(),
                event.rules.clone(),
            )
    }
}
