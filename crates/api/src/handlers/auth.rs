//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use eventsync_core::error::CoreError;
use eventsync_db::models::user::CreateUser;
use eventsync_db::StoreError;

use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const EMAIL_TAKEN: &str = "User with this email already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, message = "must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 2, max = 100))]
    pub city: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by both register and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and return an access token for it.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    input.validate()?;
    let email = normalize_email(&input.email);

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(EMAIL_TAKEN.into())));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        name: input.name.trim().to_string(),
        email,
        password_hash,
        city: input.city.trim().to_string(),
    };
    let user = match state.store.create_user(&create).await {
        Ok(user) => user,
        // Another request registered the same email in between.
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::Core(CoreError::Conflict(EMAIL_TAKEN.into())))
        }
        Err(err) => return Err(err.into()),
    };

    let token = issue_token(user.id, &state)?;
    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// POST /api/v1/auth/login
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized(INVALID_CREDENTIALS.into()));

    let user = state
        .store
        .find_user_by_email(&normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected");
        return Err(invalid());
    }

    let token = issue_token(user.id, &state)?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(TokenResponse { token }))
}

fn issue_token(user_id: eventsync_core::types::DbId, state: &AppState) -> AppResult<String> {
    state
        .tokens
        .issue(user_id)
        .map_err(|e| AppError::InternalError(e.to_string()))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
