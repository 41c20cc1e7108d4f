//! Briarwood Storefront library.
//!
//! The server half of the visitor commerce console: a JSON API serving the
//! cart, pricing, and checkout flows for tickets and the gift shop. Browser
//! clients hold no authoritative state - carts live in Postgres behind a
//! key-value port, the signed-in identity and the pending checkout snapshot
//! live in the server session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod carts;
pub mod checkout;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
