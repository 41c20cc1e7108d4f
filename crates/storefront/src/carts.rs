//! Persisted cart store.
//!
//! Wraps the pure [`Cart`] collection with load/persist around every
//! mutation, keyed per user. The active user key is a visitor id once signed
//! in, or a per-session guest key before that; signing in merges the guest
//! cart into the visitor's cart via [`CartStore::switch_user`].
//!
//! A failed persist is logged and the mutated in-memory cart is still
//! returned - the caller's view stays authoritative for the current
//! operation and the next successful mutation re-persists the full cart.

use thiserror::Error;
use tower_sessions::Session;
use uuid::Uuid;

use briarwood_core::{Cart, CartError, LineItem};

use crate::db::{KeyValue, StorageError};
use crate::models::{CurrentUser, session_keys};

/// Errors from cart store operations.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// Durable storage read failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The item failed validation entering the cart.
    #[error(transparent)]
    Item(#[from] CartError),
}

/// Storage key for a user's cart.
fn storage_key(user_key: &str) -> String {
    format!("cart_{user_key}")
}

/// Resolve the active cart user key for this session.
///
/// A signed-in visitor's cart is keyed by their visitor id. Anonymous
/// sessions get a generated guest key, remembered in the session so repeat
/// requests (and the eventual login merge) see the same cart.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn active_user_key(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(key) = existing_user_key(session).await? {
        return Ok(key);
    }

    let key = format!("guest-{}", Uuid::new_v4());
    session.insert(session_keys::GUEST_CART_KEY, &key).await?;
    Ok(key)
}

/// Resolve the cart user key this session already has, without minting one.
///
/// `None` means no cart has ever been touched in this session - there is
/// nothing to merge on login, and no guest key should be created just to
/// find that out.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn existing_user_key(
    session: &Session,
) -> Result<Option<String>, tower_sessions::session::Error> {
    if let Some(user) = session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await?
    {
        return Ok(Some(user.user_key()));
    }

    session.get::<String>(session_keys::GUEST_CART_KEY).await
}

/// Cart store bound to one user key over a key-value port.
pub struct CartStore<'a, K> {
    kv: &'a K,
    user_key: String,
}

impl<'a, K: KeyValue> CartStore<'a, K> {
    /// Bind a store to `user_key`.
    pub fn new(kv: &'a K, user_key: impl Into<String>) -> Self {
        Self {
            kv,
            user_key: user_key.into(),
        }
    }

    /// The user key this store reads and writes.
    #[must_use]
    pub fn user_key(&self) -> &str {
        &self.user_key
    }

    /// Load the current cart, defaulting to empty if none is persisted.
    ///
    /// An unparseable stored value is treated as empty (and logged) rather
    /// than wedging the cart forever.
    ///
    /// # Errors
    ///
    /// Returns [`CartStoreError::Storage`] if the read itself fails.
    pub async fn load(&self) -> Result<Cart, CartStoreError> {
        let raw = self.kv.get(&storage_key(&self.user_key)).await?;
        Ok(match raw {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(
                    user_key = %self.user_key,
                    error = %e,
                    "Discarding unparseable persisted cart"
                );
                Cart::new()
            }),
            None => Cart::new(),
        })
    }

    /// Persist the full cart under this store's key.
    ///
    /// Persistence failures are logged and swallowed; the in-memory cart
    /// remains authoritative for the current operation.
    async fn persist(&self, cart: &Cart) {
        let json = match serde_json::to_string(cart) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(user_key = %self.user_key, error = %e, "Failed to encode cart");
                return;
            }
        };
        if let Err(e) = self.kv.set(&storage_key(&self.user_key), &json).await {
            tracing::warn!(
                user_key = %self.user_key,
                error = %e,
                "Failed to persist cart; continuing with in-memory state"
            );
        }
    }

    /// Add one unit of `item` and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded or the item fails
    /// validation.
    pub async fn add_item(&self, item: LineItem) -> Result<Cart, CartStoreError> {
        let mut cart = self.load().await?;
        cart.add(item)?;
        self.persist(&cart).await;
        Ok(cart)
    }

    /// Remove the item with `id` and persist. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded.
    pub async fn remove_item(&self, id: &str) -> Result<Cart, CartStoreError> {
        let mut cart = self.load().await?;
        cart.remove(id);
        self.persist(&cart).await;
        Ok(cart)
    }

    /// Set an item's quantity (clamped to ≥ 1) and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded.
    pub async fn update_quantity(&self, id: &str, quantity: i64) -> Result<Cart, CartStoreError> {
        let mut cart = self.load().await?;
        cart.set_quantity(id, quantity);
        self.persist(&cart).await;
        Ok(cart)
    }

    /// Empty the cart and persist the empty state.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded.
    pub async fn clear(&self) -> Result<Cart, CartStoreError> {
        let mut cart = self.load().await?;
        cart.clear();
        self.persist(&cart).await;
        Ok(cart)
    }

    /// Total quantity across the active cart, derived on every read.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be loaded.
    pub async fn count(&self) -> Result<u64, CartStoreError> {
        Ok(self.load().await?.count())
    }

    /// Switch the active cart to `new_user_key`, merging quantities.
    ///
    /// Reads the cart persisted under the new key (empty if none), adds this
    /// store's quantities into it item by item, persists the merged result
    /// under the new key, and abandons the old key. Neither cart's
    /// pre-existing items are discarded, and overlapping ids sum.
    ///
    /// # Errors
    ///
    /// Returns an error if either cart cannot be loaded.
    pub async fn switch_user(
        self,
        new_user_key: impl Into<String>,
    ) -> Result<(Self, Cart), CartStoreError> {
        let source = self.load().await?;
        let next = Self::new(self.kv, new_user_key);
        let mut merged = next.load().await?;
        merged.merge_from(source);
        next.persist(&merged).await;
        Ok((next, merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::db::MemoryKv;

    fn item(id: &str) -> LineItem {
        LineItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            unit_price: Decimal::new(1250, 2),
            quantity: 1,
            category: "shop".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mutations_persist_before_next_read() {
        let kv = MemoryKv::new();
        let store = CartStore::new(&kv, "guest-1");

        store.add_item(item("X")).await.expect("add");
        store.add_item(item("X")).await.expect("add");

        // A fresh store over the same key sees the persisted state.
        let reread = CartStore::new(&kv, "guest-1");
        let cart = reread.load().await.expect("load");
        assert_eq!(cart.get("X").map(|i| i.quantity), Some(2));
        assert_eq!(reread.count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_switch_user_merges_additively() {
        let kv = MemoryKv::new();

        // Guest cart: {X:2}
        let guest = CartStore::new(&kv, "guest-1");
        guest.add_item(item("X")).await.expect("add");
        guest.add_item(item("X")).await.expect("add");

        // Visitor 42 already has {X:1, Y:3} persisted from a prior visit.
        let visitor = CartStore::new(&kv, "42");
        visitor.add_item(item("X")).await.expect("add");
        visitor.add_item(item("Y")).await.expect("add");
        visitor.update_quantity("Y", 3).await.expect("update");

        let (merged_store, merged) = guest.switch_user("42").await.expect("switch");
        assert_eq!(merged_store.user_key(), "42");
        assert_eq!(merged.get("X").map(|i| i.quantity), Some(3));
        assert_eq!(merged.get("Y").map(|i| i.quantity), Some(3));

        // Persisted under the new key; old key abandoned but not deleted.
        let reread = CartStore::new(&kv, "42").load().await.expect("load");
        assert_eq!(reread.count(), 6);
        let guest_cart = CartStore::new(&kv, "guest-1").load().await.expect("load");
        assert_eq!(guest_cart.count(), 2);
    }

    #[tokio::test]
    async fn test_switch_user_into_empty_target() {
        let kv = MemoryKv::new();
        let guest = CartStore::new(&kv, "guest-1");
        guest.add_item(item("X")).await.expect("add");

        let (_, merged) = guest.switch_user("7").await.expect("switch");
        assert_eq!(merged.count(), 1);
        assert_eq!(merged.get("X").map(|i| i.quantity), Some(1));
    }

    #[tokio::test]
    async fn test_update_quantity_floor_persists_as_one() {
        let kv = MemoryKv::new();
        let store = CartStore::new(&kv, "guest-1");
        store.add_item(item("X")).await.expect("add");
        store.update_quantity("X", 0).await.expect("update");

        let cart = CartStore::new(&kv, "guest-1").load().await.expect("load");
        assert_eq!(cart.get("X").map(|i| i.quantity), Some(1));
    }

    #[tokio::test]
    async fn test_remove_twice_is_not_an_error() {
        let kv = MemoryKv::new();
        let store = CartStore::new(&kv, "guest-1");
        store.add_item(item("X")).await.expect("add");
        store.remove_item("X").await.expect("first remove");
        let cart = store.remove_item("X").await.expect("second remove");
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_clear_persists_empty_state() {
        let kv = MemoryKv::new();
        let store = CartStore::new(&kv, "guest-1");
        store.add_item(item("X")).await.expect("add");
        store.clear().await.expect("clear");

        let cart = CartStore::new(&kv, "guest-1").load().await.expect("load");
        assert!(cart.is_empty());
    }

    fn fresh_session() -> Session {
        Session::new(None, std::sync::Arc::new(tower_sessions::MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_existing_user_key_does_not_mint_guest_key() {
        let session = fresh_session();

        let key = existing_user_key(&session).await.expect("read");
        assert_eq!(key, None);

        // Peeking must not have written a guest key into the session.
        let stored: Option<String> = session
            .get(session_keys::GUEST_CART_KEY)
            .await
            .expect("read");
        assert_eq!(stored, None);
    }

    #[tokio::test]
    async fn test_active_user_key_is_stable_across_requests() {
        let session = fresh_session();

        let first = active_user_key(&session).await.expect("resolve");
        assert!(first.starts_with("guest-"));

        let second = active_user_key(&session).await.expect("resolve");
        assert_eq!(second, first);

        // Once minted, the peek sees the same key.
        let peeked = existing_user_key(&session).await.expect("read");
        assert_eq!(peeked.as_deref(), Some(first.as_str()));
    }

    #[tokio::test]
    async fn test_corrupt_persisted_value_treated_as_empty() {
        let kv = MemoryKv::new();
        kv.set("cart_guest-1", "not json").await.expect("set");
        let cart = CartStore::new(&kv, "guest-1").load().await.expect("load");
        assert!(cart.is_empty());
    }
}
