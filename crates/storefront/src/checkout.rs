//! Checkout session handoff.
//!
//! At "proceed to checkout" the cart and its computed totals are frozen into
//! a [`CheckoutSnapshot`] stashed in the session under a fixed key. The
//! payment route reads the snapshot on entry; its absence means the user
//! navigated there directly and must be sent back to the cart. Only a
//! confirmed payment clears the snapshot - navigating away leaves it in
//! place, so `created_at` is recorded to let a client spot a stale one.
//!
//! The snapshot is a hand-off artifact between two routes, not an order
//! record; the zoo backend's order is the system of record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use briarwood_core::{LineItem, PricingResult};
use rust_decimal::Decimal;

use crate::models::session_keys;

/// Which payment endpoint a checkout settles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutKind {
    Tickets,
    Shop,
}

/// A finalized order snapshot handed from the cart to the payment route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSnapshot {
    pub kind: CheckoutKind,
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl CheckoutSnapshot {
    /// Freeze a cart's items and computed totals.
    #[must_use]
    pub fn new(kind: CheckoutKind, items: Vec<LineItem>, pricing: &PricingResult) -> Self {
        Self {
            kind,
            items,
            subtotal: pricing.subtotal,
            discount: pricing.discount,
            tax: pricing.tax,
            total: pricing.total,
            created_at: Utc::now(),
        }
    }
}

/// Write the snapshot to the session's transient checkout slot.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub async fn stash_pending(
    session: &Session,
    snapshot: &CheckoutSnapshot,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::PENDING_CHECKOUT, snapshot)
        .await
}

/// Read the pending snapshot, if one exists.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn load_pending(
    session: &Session,
) -> Result<Option<CheckoutSnapshot>, tower_sessions::session::Error> {
    session.get(session_keys::PENDING_CHECKOUT).await
}

/// Clear the pending snapshot after a confirmed payment.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_pending(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CheckoutSnapshot>(session_keys::PENDING_CHECKOUT)
        .await?;
    Ok(())
}
