//! Briarwood Core - Shared commerce types library.
//!
//! This crate provides the types shared across the Briarwood Zoo commerce
//! components:
//!
//! - `storefront` - Visitor-facing commerce API (tickets and gift shop)
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. The cart collection and the pricing pipeline live
//! here so they can be exercised without a running service.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money formatting, membership tiers, and roles
//! - [`cart`] - The line-item collection with quantity-merge semantics
//! - [`pricing`] - The subtotal → discount → tax → total pipeline

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartError, LineItem};
pub use pricing::{DEFAULT_TAX_RATE, PricingResult, compute_totals};
pub use types::*;
