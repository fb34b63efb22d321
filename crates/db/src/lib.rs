//! Persistence for EventSync.
//!
//! - [`models`] -- row structs and DTOs.
//! - [`repositories`] -- zero-sized `*Repo` structs running SQL against a [`DbPool`].
//! - [`store`] -- the storage traits the engine is written against, with a
//!   PostgreSQL implementation and an in-memory one.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::memory::MemoryStore;
pub use store::postgres::PgStore;
pub use store::{
    EventStore, FriendshipStore, RegistrationStore, SeatRelease, SeatReservation, StatusRequest,
    Store, StoreError, UserStore,
};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
