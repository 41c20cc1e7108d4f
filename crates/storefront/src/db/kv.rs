//! Durable key-value port.
//!
//! Carts persist as JSON strings under well-known keys (`cart_<userKey>`).
//! The port is the smallest surface the cart store needs - `get`, `set`,
//! `remove` over strings - so the same logic runs against Postgres in
//! production and an in-memory fake in tests. Absence of a key is a valid
//! "empty" state, not an error.

use std::collections::HashMap;
use std::sync::Mutex;

use sqlx::PgPool;
use thiserror::Error;

/// Errors from the durable key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The in-memory store's lock was poisoned by a panicking test.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Keyed string storage.
///
/// Values are JSON; callers own serialization. Implementations must treat a
/// missing key as `Ok(None)`.
pub trait KeyValue: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete the value under `key`. A no-op if the key is absent.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

// =============================================================================
// Postgres implementation
// =============================================================================

/// Postgres-backed key-value store over the `storefront_kv` table.
#[derive(Clone)]
pub struct PgKeyValue {
    pool: PgPool,
}

impl PgKeyValue {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not exist.
    ///
    /// Run once at startup, alongside the session store migration.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the DDL fails.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS storefront_kv (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            ",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

impl KeyValue for PgKeyValue {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM storefront_kv WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO storefront_kv (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM storefront_kv WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// =============================================================================
// In-memory implementation
// =============================================================================

/// In-memory key-value store for tests and local development.
#[derive(Default)]
pub struct MemoryKv {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValue for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_kv_roundtrip() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("cart_guest").await.expect("get"), None);

        kv.set("cart_guest", "[]").await.expect("set");
        assert_eq!(
            kv.get("cart_guest").await.expect("get"),
            Some("[]".to_string())
        );

        kv.set("cart_guest", r#"[{"id":"x"}]"#).await.expect("set");
        assert_eq!(
            kv.get("cart_guest").await.expect("get"),
            Some(r#"[{"id":"x"}]"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_memory_kv_remove_missing_key_is_ok() {
        let kv = MemoryKv::new();
        kv.remove("never-set").await.expect("remove");
        kv.set("k", "v").await.expect("set");
        kv.remove("k").await.expect("remove");
        assert_eq!(kv.get("k").await.expect("get"), None);
    }
}
