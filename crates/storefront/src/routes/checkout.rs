//! Checkout route handlers.
//!
//! The begin/pending/complete triple implements the cart-to-payment
//! handoff. `begin` freezes the cart and its totals into the session;
//! `pending` is what the payment page reads on entry (404 sends the client
//! back to the cart); `complete` submits the payment and, only on success,
//! clears both the snapshot and the persisted cart. A backend failure
//! leaves both in place so the user can resubmit.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use briarwood_core::{OrderId, compute_totals, format_usd};

use crate::backend::{PaymentItem, PaymentRequest};
use crate::carts::CartStore;
use crate::checkout::{self, CheckoutKind, CheckoutSnapshot};
use crate::db::KeyValue;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Begin checkout payload.
#[derive(Debug, Deserialize)]
pub struct BeginCheckoutRequest {
    pub kind: CheckoutKind,
}

/// Confirmation data returned after a successful payment.
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationView {
    pub order_id: Option<OrderId>,
    pub total: String,
}

/// Freeze the cart into a pending checkout snapshot.
///
/// Requires a signed-in visitor; an empty cart is rejected before anything
/// is written.
#[instrument(skip(state, session, user, form), fields(visitor_id = %user.0.id))]
pub async fn begin(
    State(state): State<AppState>,
    session: Session,
    user: RequireAuth,
    Json(form): Json<BeginCheckoutRequest>,
) -> Result<Json<CheckoutSnapshot>> {
    let RequireAuth(user) = user;
    let cart = CartStore::new(state.kv(), user.user_key()).load().await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let pricing = compute_totals(
        cart.items(),
        user.tier.discount_rate(),
        state.config().pricing.tax_rate,
    );
    let snapshot = CheckoutSnapshot::new(form.kind, cart.items().to_vec(), &pricing);
    checkout::stash_pending(&session, &snapshot).await?;

    Ok(Json(snapshot))
}

/// Read the pending checkout snapshot for the payment page.
///
/// `404` means the user navigated here without an active checkout; the
/// client redirects back to the cart instead of rendering empty data.
#[instrument(skip(session, _user))]
pub async fn pending(session: Session, _user: RequireAuth) -> Result<Json<CheckoutSnapshot>> {
    let snapshot = checkout::load_pending(&session)
        .await?
        .ok_or(AppError::NoPendingCheckout)?;
    Ok(Json(snapshot))
}

/// Submit the pending checkout to the zoo backend.
///
/// On success the snapshot and the persisted cart are both cleared before
/// the confirmation is returned.
#[instrument(skip(state, session, user), fields(visitor_id = %user.0.id))]
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    user: RequireAuth,
) -> Result<Json<ConfirmationView>> {
    let RequireAuth(user) = user;
    let snapshot = checkout::load_pending(&session)
        .await?
        .ok_or(AppError::NoPendingCheckout)?;

    let request = PaymentRequest {
        visitor_id: user.id,
        items: snapshot
            .items
            .iter()
            .map(|item| PaymentItem {
                id: item.id.clone(),
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect(),
    };

    // A failed submission returns here with snapshot and cart untouched.
    let receipt = state.backend().submit_payment(snapshot.kind, &request).await?;

    clear_after_payment(&session, &CartStore::new(state.kv(), user.user_key())).await;

    tracing::info!(
        visitor_id = %user.id,
        order_id = ?receipt.order_id,
        "Checkout completed"
    );

    Ok(Json(ConfirmationView {
        order_id: receipt.order_id,
        total: format_usd(snapshot.total),
    }))
}

/// Clear the snapshot and persisted cart after a confirmed payment.
///
/// The payment has already settled by the time this runs, so a cleanup
/// failure must not surface as an error response. It is logged and the
/// confirmation still goes out; the next cart mutation re-persists over the
/// stale state.
async fn clear_after_payment<K: KeyValue>(session: &Session, store: &CartStore<'_, K>) {
    if let Err(e) = checkout::clear_pending(session).await {
        tracing::warn!(error = %e, "Failed to clear checkout snapshot after payment");
    }
    if let Err(e) = store.clear().await {
        tracing::warn!(
            user_key = %store.user_key(),
            error = %e,
            "Failed to clear cart after payment"
        );
    }
}
