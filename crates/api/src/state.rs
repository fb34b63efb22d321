use std::sync::Arc;

use eventsync_db::Store;
use eventsync_engine::{EventService, FriendService, RegistrationEngine};

use crate::auth::jwt::AccessTokens;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Storage backend selected at startup.
    pub store: Arc<dyn Store>,
    pub config: Arc<ServerConfig>,
    /// Signing and verification keys, derived once from the config.
    pub tokens: Arc<AccessTokens>,
    pub registrations: RegistrationEngine,
    pub events: EventService,
    pub friends: FriendService,
}

impl AppState {
    /// Wire every service to the same store.
    pub fn new(store: Arc<dyn Store>, config: Arc<ServerConfig>) -> Self {
        Self {
            registrations: RegistrationEngine::new(Arc::clone(&store)),
            events: EventService::new(Arc::clone(&store)),
            friends: FriendService::new(Arc::clone(&store)),
            tokens: Arc::new(AccessTokens::new(
                &config.jwt_secret,
                config.token_lifetime_mins,
            )),
            store,
            config,
        }
    }
}
