//! Catalog route handlers.
//!
//! Thin relays over the zoo backend's reference data. The typed wire
//! structs in [`crate::backend`] parse the payloads at this boundary; a
//! malformed backend response fails here instead of leaking an untyped
//! blob to the client.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::backend::{MerchandiseItem, TicketType};
use crate::error::Result;
use crate::state::AppState;

/// List the purchasable ticket types.
#[instrument(skip(state))]
pub async fn tickets(State(state): State<AppState>) -> Result<Json<Vec<TicketType>>> {
    let types = state.backend().ticket_types().await?;
    Ok(Json(types))
}

/// List the gift shop merchandise.
#[instrument(skip(state))]
pub async fn shop(State(state): State<AppState>) -> Result<Json<Vec<MerchandiseItem>>> {
    let items = state.backend().merchandise().await?;
    Ok(Json(items))
}
