//! Domain services of EventSync.
//!
//! The services hold an `Arc<dyn Store>` and nothing else, so they are cheap
//! to clone and safe to call concurrently. Every rule that keeps the
//! participant set consistent with active registrations lives here or in the
//! store's atomic seat primitives.

pub mod error;
pub mod events;
pub mod friends;
pub mod registration;
pub mod views;

pub use error::{EngineError, EngineResult};
pub use events::EventService;
pub use friends::FriendService;
pub use registration::RegistrationEngine;
