//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use eventsync_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserInfo`] or [`UserPublic`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub city: String,
    pub created_at: Timestamp,
}

/// The caller's own profile.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub city: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            city: user.city.clone(),
        }
    }
}

/// What other users may see about someone.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    pub id: DbId,
    pub name: String,
    pub city: String,
}

impl From<&User> for UserPublic {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            city: user.city.clone(),
        }
    }
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub city: String,
}
