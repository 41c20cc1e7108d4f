//! Database operations for storefront `PostgreSQL`.
//!
//! The zoo backend remains the system of record for orders, animals, and
//! everything else the back office edits. The storefront database only
//! stores:
//!
//! - `sessions` - tower-sessions storage (signed-in identity, pending
//!   checkout snapshot)
//! - `storefront_kv` - the durable key-value store backing persisted carts

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod kv;

pub use kv::{KeyValue, MemoryKv, PgKeyValue, StorageError};

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
