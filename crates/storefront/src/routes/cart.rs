//! Cart route handlers.
//!
//! Every handler resolves the active user key from the session, runs the
//! mutation through the persisted cart store, and returns the refreshed
//! cart view - the persisted state is re-read into the response, so what
//! the client renders is what survived.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use briarwood_core::{Cart, LineItem, MembershipTier, compute_totals, format_usd};

use crate::carts::{CartStore, active_user_key};
use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::state::AppState;

// =============================================================================
// View types
// =============================================================================

/// One cart line as rendered by the client.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Priced totals, formatted for display.
#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub subtotal: String,
    pub discount_rate: Decimal,
    pub discount: String,
    pub tax: String,
    pub total: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub count: u64,
    pub totals: TotalsView,
}

impl CartView {
    /// Derive the view for a cart at the given tier and tax rate.
    ///
    /// Totals come from the pricing pipeline at full precision; the
    /// two-decimal rounding happens only in the formatted strings here.
    #[must_use]
    pub fn build(cart: &Cart, tier: MembershipTier, tax_rate: Decimal) -> Self {
        let pricing = compute_totals(cart.items(), tier.discount_rate(), tax_rate);
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    category: item.category.clone(),
                    quantity: item.quantity,
                    unit_price: format_usd(item.unit_price),
                    line_total: format_usd(item.line_total()),
                })
                .collect(),
            count: cart.count(),
            totals: TotalsView {
                subtotal: format_usd(pricing.subtotal),
                discount_rate: pricing.discount_rate,
                discount: format_usd(pricing.discount),
                tax: format_usd(pricing.tax),
                total: format_usd(pricing.total),
            },
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Serialize)]
pub struct CountView {
    pub count: u64,
}

// =============================================================================
// Request types
// =============================================================================

/// Add to cart payload.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub category: String,
}

/// Update quantity payload.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub id: String,
    pub quantity: i64,
}

/// Remove item payload.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub id: String,
}

fn tier_of(user: &OptionalAuth) -> MembershipTier {
    user.0.as_ref().map_or(MembershipTier::None, |u| u.tier)
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart with priced totals.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
) -> Result<Json<CartView>> {
    let key = active_user_key(&session).await?;
    let cart = CartStore::new(state.kv(), key).load().await?;
    let tax_rate = state.config().pricing.tax_rate;
    Ok(Json(CartView::build(&cart, tier_of(&user), tax_rate)))
}

/// Add one unit of an item to the cart.
#[instrument(skip(state, session, user, form), fields(item_id = %form.id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
    Json(form): Json<AddItemRequest>,
) -> Result<Json<CartView>> {
    if form.name.trim().is_empty() {
        return Err(AppError::BadRequest("item name must not be empty".to_string()));
    }

    let key = active_user_key(&session).await?;
    let cart = CartStore::new(state.kv(), key)
        .add_item(LineItem {
            id: form.id,
            name: form.name,
            unit_price: form.unit_price,
            quantity: 1,
            category: form.category,
        })
        .await?;

    let tax_rate = state.config().pricing.tax_rate;
    Ok(Json(CartView::build(&cart, tier_of(&user), tax_rate)))
}

/// Set an item's quantity.
#[instrument(skip(state, session, user, form), fields(item_id = %form.id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
    Json(form): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>> {
    let key = active_user_key(&session).await?;
    let cart = CartStore::new(state.kv(), key)
        .update_quantity(&form.id, form.quantity)
        .await?;

    let tax_rate = state.config().pricing.tax_rate;
    Ok(Json(CartView::build(&cart, tier_of(&user), tax_rate)))
}

/// Remove an item from the cart.
#[instrument(skip(state, session, user, form), fields(item_id = %form.id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    user: OptionalAuth,
    Json(form): Json<RemoveItemRequest>,
) -> Result<Json<CartView>> {
    let key = active_user_key(&session).await?;
    let cart = CartStore::new(state.kv(), key).remove_item(&form.id).await?;

    let tax_rate = state.config().pricing.tax_rate;
    Ok(Json(CartView::build(&cart, tier_of(&user), tax_rate)))
}

/// Get the cart count badge.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<Json<CountView>> {
    let key = active_user_key(&session).await?;
    let count = CartStore::new(state.kv(), key).count().await?;
    Ok(Json(CountView { count }))
}
