//! Repository for the `events` table.
//!
//! Every mutation of the participant set or the capacity recomputes the
//! event status with [`derive_status`] inside the same transaction, holding a
//! row lock on the event.

use sqlx::{PgConnection, PgPool};
use eventsync_core::capacity::{derive_status, reconcile_requested_status};
use eventsync_core::status::EventStatus;
use eventsync_core::types::DbId;

use crate::models::event::{CreateEvent, Event, UpdateEvent};
use crate::store::StatusRequest;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, banner, event_date, event_time, price, capacity, category, \
                       description, location, rules, organizer_id, organizer_name, \
                       organizer_rating, status_id, registered_users, created_at";

/// Provides CRUD and participant-set operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row. New events are open
    /// with an empty participant set.
    pub async fn create(
        pool: &PgPool,
        organizer_id: DbId,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (title, banner, event_date, event_time, price, capacity, \
                category, description, location, rules, organizer_id, organizer_name, \
                organizer_rating, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&input.banner)
            .bind(input.event_date)
            .bind(input.event_time)
            .bind(input.price)
            .bind(input.capacity)
            .bind(&input.category)
            .bind(&input.description)
            .bind(&input.location)
            .bind(&input.rules)
            .bind(organizer_id)
            .bind(&input.organizer_name)
            .bind(input.organizer_rating)
            .bind(EventStatus::Open.id())
            .fetch_one(pool)
            .await
    }

    /// Find an event by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all events, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Event>(&query).fetch_all(pool).await
    }

    /// List the events created by one organizer, newest first.
    pub async fn list_by_organizer(
        pool: &PgPool,
        organizer_id: DbId,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events WHERE organizer_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(organizer_id)
            .fetch_all(pool)
            .await
    }

    /// Find every event whose id is in `ids`. Unknown ids are skipped.
    pub async fn list_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Event>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Event>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Add `user_id` to the participant set and recompute the status.
    ///
    /// Idempotent: returns `true` only if the user was not already present.
    /// Returns `false` if the event does not exist.
    pub async fn add_participant(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(event) = Self::lock_inner(&mut tx, event_id).await? else {
            return Ok(false);
        };

        let inserted = !event.has_participant(user_id);
        let participants = if inserted {
            Self::append_participant_inner(&mut tx, event_id, user_id).await?;
            event.registered_users.len() + 1
        } else {
            event.registered_users.len()
        };
        Self::persist_derived_status_inner(&mut tx, &event, participants).await?;

        tx.commit().await?;
        Ok(inserted)
    }

    /// Remove `user_id` from the participant set and recompute the status.
    ///
    /// Idempotent: returns `true` only if the user was present.
    pub async fn remove_participant(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(event) = Self::lock_inner(&mut tx, event_id).await? else {
            return Ok(false);
        };

        let removed = event.has_participant(user_id);
        let participants = if removed {
            Self::remove_participant_inner(&mut tx, event_id, user_id).await?;
            event.registered_users.len() - 1
        } else {
            event.registered_users.len()
        };
        Self::persist_derived_status_inner(&mut tx, &event, participants).await?;

        tx.commit().await?;
        Ok(removed)
    }

    /// Apply an organizer's status request to the locked row.
    ///
    /// The request is reconciled with the participant count read under the
    /// lock, so a concurrent reservation cannot slip between check and write.
    pub async fn request_status(
        pool: &PgPool,
        id: DbId,
        requested: EventStatus,
    ) -> Result<StatusRequest, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(event) = Self::lock_inner(&mut tx, id).await? else {
            return Ok(StatusRequest::EventNotFound);
        };
        let status = match reconcile_requested_status(
            requested,
            event.capacity,
            event.registered_users.len(),
        ) {
            Ok(status) => status,
            Err(reason) => return Ok(StatusRequest::Refused(reason)),
        };

        if status != event.status {
            sqlx::query("UPDATE events SET status_id = $2 WHERE id = $1")
                .bind(id)
                .bind(status.id())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(StatusRequest::Applied(status))
    }

    /// Apply a partial update. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `true` if any stored value changed. A capacity change also
    /// recomputes the status.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<bool, sqlx::Error> {
        if input.is_empty() {
            return Ok(false);
        }

        let mut tx = pool.begin().await?;

        let Some(mut event) = Self::lock_inner(&mut tx, id).await? else {
            return Ok(false);
        };
        if !input.apply_to(&mut event) {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE events SET
                title = $2,
                banner = $3,
                event_date = $4,
                event_time = $5,
                price = $6,
                capacity = $7,
                category = $8,
                description = $9,
                location = $10,
                rules = $11
             WHERE id = $1",
        )
        .bind(id)
        .bind(&event.title)
        .bind(&event.banner)
        .bind(event.event_date)
        .bind(event.event_time)
        .bind(event.price)
        .bind(event.capacity)
        .bind(&event.category)
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.rules)
        .execute(&mut *tx)
        .await?;

        let participants = event.registered_users.len();
        Self::persist_derived_status_inner(&mut tx, &event, participants).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete an event. Its registrations are removed by `ON DELETE CASCADE`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    /// Load an event and lock its row until the surrounding transaction ends.
    pub(crate) async fn lock_inner(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    pub(crate) async fn append_participant_inner(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE events SET registered_users = array_append(registered_users, $2)
             WHERE id = $1 AND NOT ($2 = ANY(registered_users))",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub(crate) async fn remove_participant_inner(
        conn: &mut PgConnection,
        id: DbId,
        user_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE events SET registered_users = array_remove(registered_users, $2) WHERE id = $1")
            .bind(id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Write the status derived from `participants` if it differs from the
    /// locked row's current one. Returns the resulting status.
    pub(crate) async fn persist_derived_status_inner(
        conn: &mut PgConnection,
        event: &Event,
        participants: usize,
    ) -> Result<EventStatus, sqlx::Error> {
        let next = derive_status(event.status, event.capacity, participants);
        if next != event.status {
            sqlx::query("UPDATE events SET status_id = $2 WHERE id = $1")
                .bind(event.id)
                .bind(next.id())
                .execute(&mut *conn)
                .await?;
            tracing::debug!(
                event_id = event.id,
                from = %event.status,
                to = %next,
                "Event status recomputed"
            );
        }
        Ok(next)
    }
}
