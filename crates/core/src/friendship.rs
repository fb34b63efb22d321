//! Friendship rules. Requests are directed edges; every query is symmetric.

use crate::types::DbId;

/// Message returned when a friend request already exists and is accepted.
pub const MSG_ALREADY_FRIENDS: &str = "You are already friends with this user";

/// Message returned when a friend request already exists and is pending.
pub const MSG_REQUEST_ALREADY_SENT: &str = "Friend request already sent";

/// Message returned when a new friend request was stored.
pub const MSG_REQUEST_SENT: &str = "Friend request sent successfully";

/// A user cannot befriend themselves.
pub fn validate_request(from: DbId, to: DbId) -> Result<(), String> {
    if from == to {
        return Err("You cannot send a friend request to yourself".to_string());
    }
    Ok(())
}

/// Given an edge and one of its endpoints, return the other endpoint.
pub fn other_party(requester_id: DbId, recipient_id: DbId, me: DbId) -> DbId {
    if requester_id == me {
        recipient_id
    } else {
        requester_id
    }
}
