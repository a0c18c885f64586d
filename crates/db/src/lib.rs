//! PostgreSQL persistence for works, characters, locations and their links.
//!
//! - [`models`] -- row structs and create/update DTOs.
//! - [`repositories`] -- one zero-sized `*Repo` per table.
//! - [`ownership`] -- the generic owner-scoped lookup every handler goes through.
//! - [`availability`] -- the generic "not yet linked to X" query.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod availability;
pub mod models;
pub mod ownership;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
