//! Repository for the `registrations` table.
//!
//! [`RegistrationRepo::reserve_seat`] and [`RegistrationRepo::release_seat`]
//! keep the registration row and the event's participant set in step: both
//! run in one transaction holding row locks, so concurrent callers serialize
//! on the event.

use sqlx::{PgConnection, PgPool};
use eventsync_core::registration::ACTIVE_STATUSES;
use eventsync_core::status::{EventStatus, RegistrationStatus};
use eventsync_core::types::{DbId, StatusId, Timestamp};

use crate::models::registration::Registration;
use crate::repositories::EventRepo;
use crate::store::{SeatRelease, SeatReservation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, event_id, status_id, registered_at, paid_at";

fn active_status_ids() -> Vec<StatusId> {
    ACTIVE_STATUSES.iter().map(|s| s.id()).collect()
}

/// Provides lifecycle operations for registrations.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Insert a registration row without touching the event.
    ///
    /// Prefer [`Self::reserve_seat`]; this exists for fixtures and imports.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
    ) -> Result<Registration, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert_inner(&mut conn, user_id, event_id, status, None).await
    }

    /// Find a registration by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registrations WHERE id = $1");
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every registration a user ever made, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Registration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM registrations WHERE user_id = $1 \
             ORDER BY registered_at DESC, id DESC"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Active registrations for an event, oldest first.
    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<Registration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM registrations \
             WHERE event_id = $1 AND status_id = ANY($2) \
             ORDER BY registered_at, id"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(event_id)
            .bind(active_status_ids())
            .fetch_all(pool)
            .await
    }

    /// The active registration of `user_id` for `event_id`, if any.
    pub async fn find_active(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::find_active_inner(&mut conn, user_id, event_id).await
    }

    /// Compare-and-set status change between two statuses that both hold a
    /// seat. `paid_at` only fills an empty payment time.
    ///
    /// Returns `false` when the row is gone or no longer in `from`.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        from: RegistrationStatus,
        to: RegistrationStatus,
        paid_at: Option<Timestamp>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE registrations SET status_id = $3, paid_at = COALESCE(paid_at, $4)
             WHERE id = $1 AND status_id = $2",
        )
        .bind(id)
        .bind(from.id())
        .bind(to.id())
        .bind(paid_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically check capacity and duplicates, insert the registration and
    /// take a seat in the event.
    ///
    /// An `Approved` initial status stamps `paid_at` with `now`.
    pub async fn reserve_seat(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
        now: Timestamp,
    ) -> Result<SeatReservation, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(event) = EventRepo::lock_inner(&mut tx, event_id).await? else {
            return Ok(SeatReservation::EventNotFound);
        };
        if event.status == EventStatus::Closed {
            return Ok(SeatReservation::EventClosed);
        }
        if event.status == EventStatus::Full || event.remaining_seats() <= 0 {
            return Ok(SeatReservation::EventFull);
        }
        if Self::find_active_inner(&mut tx, user_id, event_id)
            .await?
            .is_some()
        {
            return Ok(SeatReservation::AlreadyRegistered);
        }

        let paid_at = (status == RegistrationStatus::Approved).then_some(now);
        let registration =
            Self::insert_inner(&mut tx, user_id, event_id, status, paid_at).await?;

        let participants = if event.has_participant(user_id) {
            event.registered_users.len()
        } else {
            EventRepo::append_participant_inner(&mut tx, event_id, user_id).await?;
            event.registered_users.len() + 1
        };
        EventRepo::persist_derived_status_inner(&mut tx, &event, participants).await?;

        tx.commit().await?;
        Ok(SeatReservation::Reserved(registration))
    }

    /// Atomically move a registration into the terminal status `to` and free
    /// its seat.
    ///
    /// The current status must be one of `allowed_from`, otherwise nothing is
    /// written and [`SeatRelease::NotActive`] carries the current status.
    pub async fn release_seat(
        pool: &PgPool,
        id: DbId,
        allowed_from: &[RegistrationStatus],
        to: RegistrationStatus,
    ) -> Result<SeatRelease, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM registrations WHERE id = $1 FOR UPDATE");
        let Some(mut registration) = sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(SeatRelease::NotFound);
        };
        if !allowed_from.contains(&registration.status) {
            return Ok(SeatRelease::NotActive(registration.status));
        }

        sqlx::query("UPDATE registrations SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(to.id())
            .execute(&mut *tx)
            .await?;
        registration.status = to;

        if let Some(event) = EventRepo::lock_inner(&mut tx, registration.event_id).await? {
            let participants = if event.has_participant(registration.user_id) {
                EventRepo::remove_participant_inner(&mut tx, event.id, registration.user_id)
                    .await?;
                event.registered_users.len() - 1
            } else {
                event.registered_users.len()
            };
            EventRepo::persist_derived_status_inner(&mut tx, &event, participants).await?;
        }

        tx.commit().await?;
        Ok(SeatRelease::Released(registration))
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    async fn insert_inner(
        conn: &mut PgConnection,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
        paid_at: Option<Timestamp>,
    ) -> Result<Registration, sqlx::Error> {
        let query = format!(
            "INSERT INTO registrations (user_id, event_id, status_id, paid_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(user_id)
            .bind(event_id)
            .bind(status.id())
            .bind(paid_at)
            .fetch_one(&mut *conn)
            .await
    }

    async fn find_active_inner(
        conn: &mut PgConnection,
        user_id: DbId,
        event_id: DbId,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM registrations \
             WHERE user_id = $1 AND event_id = $2 AND status_id = ANY($3) \
             LIMIT 1"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(user_id)
            .bind(event_id)
            .bind(active_status_ids())
            .fetch_optional(&mut *conn)
            .await
    }
}
