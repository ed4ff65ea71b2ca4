//! Postgres persistence for artwork review batches.
//!
//! [`PgArtworkStore`] implements the core `ArtworkStore` boundary on top of
//! the repositories in [`repositories`].

pub mod models;
pub mod repositories;
pub mod store;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub use store::PgArtworkStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
///
/// `acquire_timeout` bounds how long a request waits for a free connection
/// before failing with a persistence error.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
