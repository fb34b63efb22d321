//! Event listing, detail and organizer management.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use eventsync_core::status::EventStatus;
use eventsync_core::types::DbId;
use eventsync_db::models::event::{CreateEvent, Event, UpdateEvent};
use eventsync_db::{StatusRequest, Store};

use crate::error::{EngineError, EngineResult};
use crate::views::{CreatedEvent, EventDetail, EventSummary, MessageResponse, ParticipantInfo};

#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn Store>,
}

impl EventService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list_events(&self) -> EngineResult<Vec<EventSummary>> {
        let events = self.store.list_events().await?;
        Ok(events.iter().map(EventSummary::from).collect())
    }

    pub async fn list_organized_events(
        &self,
        organizer_id: DbId,
    ) -> EngineResult<Vec<EventSummary>> {
        let events = self.store.list_events_by_organizer(organizer_id).await?;
        Ok(events.iter().map(EventSummary::from).collect())
    }

    /// Full event view with its participants.
    ///
    /// `is_friend` is computed only when a viewer is known; anonymous viewers
    /// see every participant flagged as not a friend.
    pub async fn get_event_detail(
        &self,
        event_id: DbId,
        viewer: Option<DbId>,
    ) -> EngineResult<EventDetail> {
        let event = self.load_event(event_id).await?;

        let users: HashMap<DbId, _> = self
            .store
            .find_users_by_ids(&event.registered_users)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let friends: HashSet<DbId> = match viewer {
            Some(viewer_id) if !users.is_empty() => self
                .store
                .list_friend_ids(viewer_id)
                .await?
                .into_iter()
                .collect(),
            _ => HashSet::new(),
        };

        // Registration order; ids without a user row are dropped.
        let participants = event
            .registered_users
            .iter()
            .filter_map(|id| users.get(id))
            .map(|user| ParticipantInfo {
                id: user.id,
                name: user.name.clone(),
                city: user.city.clone(),
                is_friend: friends.contains(&user.id),
            })
            .collect();

        Ok(EventDetail::new(&event, participants))
    }

    /// Create an event owned by `organizer_id`. It starts open and empty.
    pub async fn create_event(
        &self,
        organizer_id: DbId,
        input: &CreateEvent,
    ) -> EngineResult<CreatedEvent> {
        let event = self.store.create_event(organizer_id, input).await?;
        tracing::info!(event_id = event.id, organizer_id, "Event created");
        Ok(CreatedEvent {
            message: "Event created successfully".to_string(),
            event_id: event.id,
        })
    }

    pub async fn update_event(
        &self,
        event_id: DbId,
        input: &UpdateEvent,
        caller: DbId,
    ) -> EngineResult<MessageResponse> {
        let event = self.load_event(event_id).await?;
        ensure_organizer(&event, caller)?;

        if self.store.update_event(event_id, input).await? {
            tracing::info!(event_id, "Event updated");
            Ok(MessageResponse::new("Event updated successfully"))
        } else {
            Ok(MessageResponse::new("No changes were made"))
        }
    }

    /// Set the status requested by the organizer, reconciled with capacity.
    /// `full` needs no seats left, `open` needs at least one, and closing an
    /// event with no seats left keeps it `full`. The seat count is read under
    /// the same lock as the write.
    pub async fn update_event_status(
        &self,
        event_id: DbId,
        requested: EventStatus,
        caller: DbId,
    ) -> EngineResult<MessageResponse> {
        let event = self.load_event(event_id).await?;
        ensure_organizer(&event, caller)?;

        let status = match self.store.request_event_status(event_id, requested).await? {
            StatusRequest::Applied(status) => status,
            StatusRequest::Refused(reason) => return Err(EngineError::InvalidState(reason)),
            StatusRequest::EventNotFound => return Err(EngineError::event_not_found(event_id)),
        };

        tracing::info!(event_id, %requested, %status, "Event status updated");
        Ok(MessageResponse::new(format!(
            "Event status updated to {status}"
        )))
    }

    /// Delete an event together with its registrations.
    pub async fn delete_event(&self, event_id: DbId, caller: DbId) -> EngineResult<MessageResponse> {
        let event = self.load_event(event_id).await?;
        ensure_organizer(&event, caller)?;

        if !self.store.delete_event(event_id).await? {
            return Err(EngineError::event_not_found(event_id));
        }
        tracing::info!(event_id, "Event deleted");
        Ok(MessageResponse::new("Event deleted successfully"))
    }

    async fn load_event(&self, id: DbId) -> EngineResult<Event> {
        self.store
            .find_event(id)
            .await?
            .ok_or_else(|| EngineError::event_not_found(id))
    }
}

fn ensure_organizer(event: &Event, caller: DbId) -> EngineResult<()> {
    if event.organizer_id != caller {
        return Err(EngineError::NotOrganizer);
    }
    Ok(())
}
