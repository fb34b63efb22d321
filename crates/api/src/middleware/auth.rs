//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use eventsync_core::error::CoreError;
use eventsync_core::types::DbId;

use crate::auth::jwt::TokenError;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires authentication:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let user_id = user_id_from_header(auth_header, state)?;
        Ok(AuthUser { user_id })
    }
}

/// Optional authentication for public routes that personalise their output.
///
/// No `Authorization` header yields `MaybeAuthUser(None)`. A header that is
/// present but invalid is still rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<DbId>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.headers.get("authorization") {
            None => Ok(MaybeAuthUser(None)),
            Some(value) => {
                let header = value.to_str().map_err(|_| {
                    AppError::Core(CoreError::Unauthorized(
                        "Invalid Authorization header".into(),
                    ))
                })?;
                Ok(MaybeAuthUser(Some(user_id_from_header(header, state)?)))
            }
        }
    }
}

fn user_id_from_header(auth_header: &str, state: &AppState) -> Result<DbId, AppError> {
    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })?;

    state.tokens.verify(token).map_err(|e| {
        let message = match e {
            TokenError::Expired => "Token has expired",
            _ => "Invalid token",
        };
        AppError::Core(CoreError::Unauthorized(message.into()))
    })
}
