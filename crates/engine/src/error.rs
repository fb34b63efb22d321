use eventsync_core::status::RegistrationStatus;
use eventsync_core::types::DbId;
use eventsync_db::StoreError;

/// Outcome of an engine operation that did not succeed.
///
/// Everything except [`EngineError::Store`] is a user error and is safe to
/// show to the caller verbatim.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Event is full")]
    EventFull,

    #[error("You are already registered for this event")]
    AlreadyRegistered,

    #[error("Event is closed for registration")]
    EventClosed,

    #[error("This registration cannot be cancelled")]
    CannotCancel { status: RegistrationStatus },

    #[error("You are not the organizer of this event")]
    NotOrganizer,

    #[error("You don't have permission to perform this action")]
    Forbidden,

    /// A requested transition is not allowed from the current state.
    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub(crate) fn event_not_found(id: DbId) -> Self {
        EngineError::NotFound { entity: "Event", id }
    }

    pub(crate) fn registration_not_found(id: DbId) -> Self {
        EngineError::NotFound {
            entity: "Registration",
            id,
        }
    }

    pub(crate) fn user_not_found(id: DbId) -> Self {
        EngineError::NotFound { entity: "User", id }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
