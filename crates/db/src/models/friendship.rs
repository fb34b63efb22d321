//! Friendship entity model.

use serde::Serialize;
use sqlx::FromRow;
use eventsync_core::status::FriendshipStatus;
use eventsync_core::types::{DbId, Timestamp};

/// A directed friend request edge from the `friendships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Friendship {
    pub id: DbId,
    pub requester_id: DbId,
    pub recipient_id: DbId,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: FriendshipStatus,
    pub created_at: Timestamp,
}

impl Friendship {
    /// Whether `user_id` is either endpoint of this edge.
    pub fn involves(&self, user_id: DbId) -> bool {
        self.requester_id == user_id || self.recipient_id == user_id
    }
}
