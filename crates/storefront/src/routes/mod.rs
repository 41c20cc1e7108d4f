//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (verifies database)
//!
//! # Cart
//! GET  /cart                - Cart contents with priced totals
//! POST /cart/add            - Add an item (same id merges, +1 quantity)
//! POST /cart/update         - Set an item quantity (floor of 1)
//! POST /cart/remove         - Remove an item (idempotent)
//! GET  /cart/count          - Badge count
//!
//! # Checkout (requires auth)
//! POST /checkout/begin      - Freeze the cart into a pending snapshot
//! GET  /checkout/pending    - Read the snapshot on the payment page
//! POST /checkout/complete   - Submit payment, clear snapshot and cart
//!
//! # Auth
//! POST /auth/login          - Sign in; merges the guest cart
//! POST /auth/logout         - Sign out
//! GET  /auth/session        - Current session state for client boot
//!
//! # Catalog (reference data relayed from the zoo backend)
//! GET  /catalog/tickets     - Purchasable ticket types
//! GET  /catalog/shop        - Gift shop merchandise
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/begin", post(checkout::begin))
        .route("/pending", get(checkout::pending))
        .route("/complete", post(checkout::complete))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session_info))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(catalog::tickets))
        .route("/shop", get(catalog::shop))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/auth", auth_routes())
        .nest("/catalog", catalog_routes())
}
