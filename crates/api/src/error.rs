use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use eventsync_core::error::CoreError;
use eventsync_db::StoreError;
use eventsync_engine::EngineError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `eventsync_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage failure that the engine did not interpret.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err {
            EngineError::NotFound { entity, id } => {
                AppError::Core(CoreError::NotFound { entity, id })
            }
            EngineError::EventFull | EngineError::AlreadyRegistered => {
                AppError::Core(CoreError::Conflict(message))
            }
            EngineError::EventClosed
            | EngineError::CannotCancel { .. }
            | EngineError::InvalidState(_) => AppError::Core(CoreError::InvalidState(message)),
            EngineError::NotOrganizer | EngineError::Forbidden => {
                AppError::Core(CoreError::Forbidden(message))
            }
            EngineError::Validation(msg) => AppError::Core(CoreError::Validation(msg)),
            EngineError::Store(store) => AppError::Store(store),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::from(errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found"),
                ),
                CoreError::InvalidId { entity, value } => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_ID",
                    format!("Invalid {} id: {value}", entity.to_lowercase()),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::InvalidState(msg) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INVALID_STATE",
                    msg.clone(),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// - Unique constraint violations (`uq_*`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Duplicate(constraint) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        StoreError::Database(db_err) => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use eventsync_core::status::RegistrationStatus;

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_engine_errors_map_to_http_statuses() {
        assert_eq!(
            status_of(EngineError::NotFound { entity: "Event", id: 3 }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(EngineError::EventFull), StatusCode::CONFLICT);
        assert_eq!(status_of(EngineError::AlreadyRegistered), StatusCode::CONFLICT);
        assert_eq!(
            status_of(EngineError::EventClosed),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(EngineError::CannotCancel {
                status: RegistrationStatus::Finalized
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(EngineError::NotOrganizer), StatusCode::FORBIDDEN);
        assert_eq!(status_of(EngineError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(EngineError::Validation("bad".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_engine_messages_survive_mapping() {
        let err = AppError::from(EngineError::EventFull);
        assert_matches!(
            err,
            AppError::Core(CoreError::Conflict(ref msg)) if msg == "Event is full"
        );
    }

    #[test]
    fn test_invalid_id_is_bad_request() {
        let err = CoreError::InvalidId {
            entity: "Event",
            value: "abc".into(),
        };
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_errors() {
        assert_eq!(
            status_of(StoreError::Duplicate("uq_users_email".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(StoreError::Database(sqlx::Error::PoolTimedOut)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
