//! Repository for the `friendships` table.
//!
//! Rows are directed (requester -> recipient) but every lookup treats the
//! pair as unordered.

use sqlx::PgPool;
use eventsync_core::status::FriendshipStatus;
use eventsync_core::types::DbId;

use crate::models::friendship::Friendship;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, requester_id, recipient_id, status_id, created_at";

/// Provides friend request and friend list operations.
pub struct FriendshipRepo;

impl FriendshipRepo {
    /// Insert a pending request.
    ///
    /// Fails with a unique violation on `uq_friendships_pair` if any edge
    /// already exists between the two users.
    pub async fn create_request(
        pool: &PgPool,
        requester_id: DbId,
        recipient_id: DbId,
    ) -> Result<Friendship, sqlx::Error> {
        let query = format!(
            "INSERT INTO friendships (requester_id, recipient_id, status_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(requester_id)
            .bind(recipient_id)
            .bind(FriendshipStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Friendship>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM friendships WHERE id = $1");
        sqlx::query_as::<_, Friendship>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The edge between two users, in either direction.
    pub async fn find_between(
        pool: &PgPool,
        a: DbId,
        b: DbId,
    ) -> Result<Option<Friendship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM friendships \
             WHERE (requester_id = $1 AND recipient_id = $2) \
                OR (requester_id = $2 AND recipient_id = $1) \
             LIMIT 1"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(a)
            .bind(b)
            .fetch_optional(pool)
            .await
    }

    /// Mark a request accepted. Returns `false` if the row does not exist.
    pub async fn accept(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE friendships SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(FriendshipStatus::Accepted.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether an accepted edge exists between two users.
    pub async fn are_friends(pool: &PgPool, a: DbId, b: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM friendships
                WHERE status_id = $3
                  AND ((requester_id = $1 AND recipient_id = $2)
                    OR (requester_id = $2 AND recipient_id = $1))
             )",
        )
        .bind(a)
        .bind(b)
        .bind(FriendshipStatus::Accepted.id())
        .fetch_one(pool)
        .await
    }

    /// Pending requests addressed to `user_id`, newest first.
    pub async fn list_pending_received(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Friendship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM friendships \
             WHERE recipient_id = $1 AND status_id = $2 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(user_id)
            .bind(FriendshipStatus::Pending.id())
            .fetch_all(pool)
            .await
    }

    /// Ids of every accepted friend of `user_id`, in either direction.
    pub async fn friend_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT CASE WHEN requester_id = $1 THEN recipient_id ELSE requester_id END
             FROM friendships
             WHERE status_id = $2 AND (requester_id = $1 OR recipient_id = $1)
             ORDER BY id",
        )
        .bind(user_id)
        .bind(FriendshipStatus::Accepted.id())
        .fetch_all(pool)
        .await
    }
}
