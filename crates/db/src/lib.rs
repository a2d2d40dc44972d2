//! Relational storage for Cheddit.
//!
//! - [`models`] -- row structs and create DTOs.
//! - [`repositories`] -- PostgreSQL queries, one zero-sized repo per table.
//! - [`store`] -- the store traits components are injected with, plus
//!   [`PgStore`](store::PgStore) over a pool.
//! - [`memory`] -- an in-process [`MemoryStore`](memory::MemoryStore) with the
//!   same constraints, used by tests and local runs without PostgreSQL.

use sqlx::postgres::PgPoolOptions;

pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use store::{Store, StoreError};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
