//! Session-related types.
//!
//! Types stored in the session for authentication state and the checkout
//! handoff.

use serde::{Deserialize, Serialize};

use briarwood_core::{MembershipTier, Role, VisitorId};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user. The
/// membership tier rides along because the pricing pipeline needs it on
/// every cart read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Visitor's backend ID.
    pub id: VisitorId,
    /// Account role.
    pub role: Role,
    /// Membership tier driving the cart discount.
    pub tier: MembershipTier,
}

impl CurrentUser {
    /// The key this user's cart persists under.
    #[must_use]
    pub fn user_key(&self) -> String {
        self.id.to_string()
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the guest cart key assigned before sign-in.
    pub const GUEST_CART_KEY: &str = "guest_cart_key";

    /// Key for the pending checkout snapshot (transient storage).
    pub const PENDING_CHECKOUT: &str = "pending_checkout";
}
