//! Data access for FreeFlow.
//!
//! - [`client`] -- the injected [`client::BackendClient`] seam every handler
//!   talks through.
//! - [`postgres`] / [`memory`] -- its Postgres and in-process implementations.
//! - [`models`] -- one typed row struct plus create/update DTOs per table.
//! - [`repositories`] -- typed operations per table built on [`repositories::crud`].

use freeflow_core::error::CoreError;
use sqlx::postgres::PgPoolOptions;

pub mod client;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repositories;

pub use client::{BackendClient, ClientError, Row, Selection, SharedClient};
pub use memory::MemoryClient;
pub use postgres::PgClient;

pub type DbPool = sqlx::PgPool;

/// Error type returned by repositories.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain-level error (validation, not-found, ...).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The backend rejected or failed the operation.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
