//! The line-item collection with quantity-merge semantics.
//!
//! A [`Cart`] holds at most one [`LineItem`] per item id; adding an id that
//! is already present increments its quantity instead of inserting a second
//! entry. Quantities are always at least 1 - an item that would reach zero is
//! removed, never retained at zero.
//!
//! Persistence is not handled here. The storefront wraps this collection in a
//! store that reloads and re-persists it around every mutation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when an item enters the cart.
///
/// Price and quantity validation happens here, at the point items enter the
/// collection; downstream consumers (the pricing pipeline in particular) may
/// assume validated input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Item carries a negative unit price.
    #[error("item {0} has a negative unit price")]
    NegativePrice(String),

    /// Item id is empty.
    #[error("item id must not be empty")]
    EmptyId,
}

/// One purchasable entry: a ticket type or a merchandise item.
///
/// Identity is `id`. `quantity` is the only field mutated in place once the
/// item exists in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub category: String,
}

impl LineItem {
    /// The extended price for this line: `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// The active collection of selected line items.
///
/// Serializes as a plain `LineItem[]` array, which is also the persisted
/// representation under a `cart_<userKey>` storage key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total quantity across all items.
    ///
    /// Always derived from the items; never stored independently, so it
    /// cannot drift from the cart contents.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Add one unit of `item`.
    ///
    /// If an item with the same id already exists its quantity is incremented
    /// by 1 and the incoming descriptive fields are ignored; otherwise the
    /// item is inserted with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the item has an empty id or a negative unit
    /// price.
    pub fn add(&mut self, item: LineItem) -> Result<(), CartError> {
        if item.id.is_empty() {
            return Err(CartError::EmptyId);
        }
        if item.unit_price < Decimal::ZERO {
            return Err(CartError::NegativePrice(item.id));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.items.push(LineItem { quantity: 1, ..item });
        }
        Ok(())
    }

    /// Remove the item with `id`.
    ///
    /// A no-op, not an error, if the id is absent.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    /// Set the quantity of the item with `id`, clamped to a minimum of 1.
    ///
    /// This path never produces a zero or negative quantity; removal goes
    /// through [`Cart::remove`]. A no-op if the id is absent.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            let clamped = quantity.clamp(1, i64::from(u32::MAX));
            item.quantity = u32::try_from(clamped).unwrap_or(1);
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Merge `source` into this cart, adding quantities.
    ///
    /// For every source item: if an item with the same id exists here, the
    /// source quantity is **added** to it (never max or replace - two carts
    /// each holding 2 of the same item produce 4, not 2); otherwise the
    /// source item is inserted as-is. This is the guest-cart-into-account
    /// merge that runs on login.
    pub fn merge_from(&mut self, source: Self) {
        for item in source.items {
            if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                self.items.push(item);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, unit_price: Decimal) -> LineItem {
        LineItem {
            id: id.to_string(),
            name: format!("Item {id}"),
            unit_price,
            quantity: 1,
            category: "ticket".to_string(),
        }
    }

    fn cart_with(entries: &[(&str, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (id, qty) in entries {
            cart.add(item(id, Decimal::new(1000, 2))).expect("add");
            cart.set_quantity(id, i64::from(*qty));
        }
        cart
    }

    #[test]
    fn test_add_inserts_with_quantity_one() {
        let mut cart = Cart::new();
        let mut incoming = item("X", Decimal::new(500, 2));
        incoming.quantity = 9; // ignored on insert
        cart.add(incoming).expect("add");
        assert_eq!(cart.get("X").map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_add_existing_id_increments() {
        let mut cart = Cart::new();
        cart.add(item("X", Decimal::new(500, 2))).expect("add");
        cart.add(item("X", Decimal::new(500, 2))).expect("add");
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get("X").map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_add_rejects_negative_price() {
        let mut cart = Cart::new();
        let err = cart.add(item("X", Decimal::new(-1, 2))).unwrap_err();
        assert_eq!(err, CartError::NegativePrice("X".to_string()));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_rejects_empty_id() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add(item("", Decimal::ZERO)).unwrap_err(),
            CartError::EmptyId
        );
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut cart = cart_with(&[("X", 2), ("Y", 1)]);
        cart.remove("X");
        let after_first = cart.clone();
        cart.remove("X");
        assert_eq!(cart, after_first);
        assert!(cart.get("X").is_none());
        assert!(cart.get("Y").is_some());
    }

    #[test]
    fn test_set_quantity_clamps_to_floor_of_one() {
        let mut cart = cart_with(&[("X", 3)]);
        cart.set_quantity("X", 0);
        assert_eq!(cart.get("X").map(|i| i.quantity), Some(1));
        cart.set_quantity("X", -5);
        assert_eq!(cart.get("X").map(|i| i.quantity), Some(1));
        cart.set_quantity("X", 7);
        assert_eq!(cart.get("X").map(|i| i.quantity), Some(7));
    }

    #[test]
    fn test_set_quantity_missing_id_is_noop() {
        let mut cart = cart_with(&[("X", 1)]);
        cart.set_quantity("Z", 4);
        assert_eq!(cart.count(), 1);
    }

    #[test]
    fn test_count_tracks_every_mutation() {
        let mut cart = Cart::new();
        assert_eq!(cart.count(), 0);
        cart.add(item("X", Decimal::ONE)).expect("add");
        cart.add(item("X", Decimal::ONE)).expect("add");
        cart.add(item("Y", Decimal::ONE)).expect("add");
        assert_eq!(cart.count(), 3);
        cart.set_quantity("Y", 5);
        assert_eq!(cart.count(), 7);
        cart.remove("X");
        assert_eq!(cart.count(), 5);
        cart.clear();
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_merge_is_additive_on_quantity() {
        // A = {X:2}, B = {X:1, Y:3}  =>  {X:3, Y:3}
        let source = cart_with(&[("X", 2)]);
        let mut target = cart_with(&[("X", 1), ("Y", 3)]);
        target.merge_from(source);
        assert_eq!(target.get("X").map(|i| i.quantity), Some(3));
        assert_eq!(target.get("Y").map(|i| i.quantity), Some(3));
        assert_eq!(target.items().len(), 2);
    }

    #[test]
    fn test_merge_same_item_in_both_carts_sums() {
        let source = cart_with(&[("X", 2)]);
        let mut target = cart_with(&[("X", 2)]);
        target.merge_from(source);
        assert_eq!(target.get("X").map(|i| i.quantity), Some(4));
    }

    #[test]
    fn test_merge_into_empty_target_keeps_source_items() {
        let source = cart_with(&[("X", 2), ("Y", 1)]);
        let mut target = Cart::new();
        target.merge_from(source.clone());
        assert_eq!(target, source);
    }

    #[test]
    fn test_serializes_as_plain_item_array() {
        let cart = cart_with(&[("X", 2)]);
        let json = serde_json::to_string(&cart).expect("serialize");
        assert!(json.starts_with('['), "expected array, got: {json}");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }
}
