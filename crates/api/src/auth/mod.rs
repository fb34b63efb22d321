//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- HS256 access tokens issued at login and checked by the extractors.

pub mod jwt;
pub mod password;
