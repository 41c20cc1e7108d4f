//! Shared type definitions.
//!
//! Newtype wrappers and small enums used across the commerce components.

pub mod id;
pub mod money;
pub mod role;
pub mod tier;

pub use id::{OrderId, VisitorId};
pub use money::format_usd;
pub use role::Role;
pub use tier::MembershipTier;
