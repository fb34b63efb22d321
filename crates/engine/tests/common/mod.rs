#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use eventsync_core::types::DbId;
use eventsync_db::models::event::CreateEvent;
use eventsync_db::models::user::CreateUser;
use eventsync_db::{MemoryStore, Store, UserStore};
use eventsync_engine::{EventService, FriendService, RegistrationEngine};

/// Services wired to one shared in-memory store.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub registrations: RegistrationEngine,
    pub events: EventService,
    pub friends: FriendService,
}

pub fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn Store> = store.clone();
    Fixture {
        registrations: RegistrationEngine::new(shared.clone()),
        events: EventService::new(shared.clone()),
        friends: FriendService::new(shared),
        store,
    }
}

impl Fixture {
    pub async fn user(&self, name: &str) -> DbId {
        let input = CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "not-a-real-hash".to_string(),
            city: "Recife".to_string(),
        };
        self.store.create_user(&input).await.unwrap().id
    }

    pub async fn event(&self, organizer_id: DbId, capacity: i32, price: Option<f64>) -> DbId {
        self.events
            .create_event(organizer_id, &event_input(capacity, price))
            .await
            .unwrap()
            .event_id
    }
}

pub fn event_input(capacity: i32, price: Option<f64>) -> CreateEvent {
    CreateEvent {
        title: "Samba workshop".to_string(),
        banner: "https://example.com/banner.png".to_string(),
        event_date: NaiveDate::from_ymd_opt(2026, 11, 14).unwrap(),
        event_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        price,
        capacity,
        category: "Dance".to_string(),
        description: "Beginners welcome".to_string(),
        location: "Community hall".to_string(),
        rules: vec!["Comfortable shoes".to_string()],
        organizer_name: "Organizer".to_string(),
        organizer_rating: 4.8,
    }
}
