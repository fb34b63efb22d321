//! Domain building blocks shared by every EventSync crate.
//!
//! Nothing in here touches I/O: ids and timestamps, the error taxonomy,
//! closed status enums, and the pure rules behind capacity tracking and the
//! registration lifecycle.

pub mod capacity;
pub mod error;
pub mod friendship;
pub mod ids;
pub mod registration;
pub mod status;
pub mod types;
