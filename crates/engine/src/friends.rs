//! Friend requests and friend lists.

use std::collections::HashMap;
use std::sync::Arc;

use eventsync_core::friendship::{
    validate_request, MSG_ALREADY_FRIENDS, MSG_REQUEST_ALREADY_SENT, MSG_REQUEST_SENT,
};
use eventsync_core::status::FriendshipStatus;
use eventsync_core::types::DbId;
use eventsync_db::models::user::UserPublic;
use eventsync_db::{Store, StoreError};

use crate::error::{EngineError, EngineResult};
use crate::views::{FriendRequestView, MessageResponse};

#[derive(Clone)]
pub struct FriendService {
    store: Arc<dyn Store>,
}

impl FriendService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Send a friend request from `from` to `to`.
    ///
    /// An existing edge in either direction is reported in the message
    /// rather than as an error.
    pub async fn send_friend_request(&self, from: DbId, to: DbId) -> EngineResult<MessageResponse> {
        validate_request(from, to).map_err(EngineError::Validation)?;

        if self.store.find_user(to).await?.is_none() {
            return Err(EngineError::user_not_found(to));
        }

        if let Some(existing) = self.store.find_friendship_between(from, to).await? {
            let message = match existing.status {
                FriendshipStatus::Accepted => MSG_ALREADY_FRIENDS,
                FriendshipStatus::Pending => MSG_REQUEST_ALREADY_SENT,
            };
            return Ok(MessageResponse::new(message));
        }

        match self.store.create_friend_request(from, to).await {
            Ok(friendship) => {
                tracing::info!(friendship_id = friendship.id, from, to, "Friend request sent");
                Ok(MessageResponse::new(MSG_REQUEST_SENT))
            }
            // Lost a race with a request in the other direction.
            Err(StoreError::Duplicate(_)) => Ok(MessageResponse::new(MSG_REQUEST_ALREADY_SENT)),
            Err(err) => Err(err.into()),
        }
    }

    /// Accept a pending request. Only its recipient may accept it.
    pub async fn accept_friend_request(
        &self,
        friendship_id: DbId,
        caller: DbId,
    ) -> EngineResult<MessageResponse> {
        let friendship = self
            .store
            .find_friendship(friendship_id)
            .await?
            .ok_or(EngineError::NotFound {
                entity: "Friend request",
                id: friendship_id,
            })?;

        if friendship.recipient_id != caller {
            return Err(EngineError::Forbidden);
        }
        if friendship.status == FriendshipStatus::Accepted {
            return Ok(MessageResponse::new(MSG_ALREADY_FRIENDS));
        }

        self.store.accept_friendship(friendship_id).await?;
        tracing::info!(friendship_id, caller, "Friend request accepted");
        Ok(MessageResponse::new("Friend request accepted"))
    }

    /// Pending requests received by `user_id`, with the requester's public info.
    pub async fn list_pending_requests(
        &self,
        user_id: DbId,
    ) -> EngineResult<Vec<FriendRequestView>> {
        let pending = self.store.list_pending_requests(user_id).await?;
        let requester_ids: Vec<DbId> = pending.iter().map(|f| f.requester_id).collect();
        let users: HashMap<DbId, UserPublic> = self
            .store
            .find_users_by_ids(&requester_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserPublic::from(u)))
            .collect();

        Ok(pending
            .into_iter()
            .filter_map(|f| {
                users.get(&f.requester_id).map(|requester| FriendRequestView {
                    id: f.id,
                    requester: requester.clone(),
                    created_at: f.created_at,
                })
            })
            .collect())
    }

    /// Public info of every accepted friend of `user_id`.
    pub async fn list_friends(&self, user_id: DbId) -> EngineResult<Vec<UserPublic>> {
        let ids = self.store.list_friend_ids(user_id).await?;
        let users = self.store.find_users_by_ids(&ids).await?;
        Ok(users.iter().map(UserPublic::from).collect())
    }
}
