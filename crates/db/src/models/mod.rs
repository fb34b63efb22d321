//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Where the entity is editable, an update DTO (all `Option` fields)

pub mod event;
pub mod friendship;
pub mod registration;
pub mod user;
