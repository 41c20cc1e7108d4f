//! Authentication route handlers.
//!
//! Credential verification lives in the zoo backend; these handlers manage
//! the session record and trigger the guest-cart merge. The identity
//! context never calls into the cart store on its own - the composition
//! happens here, in the login handler, right after the session is set.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use briarwood_core::{MembershipTier, Role, VisitorId};

use crate::backend::BackendError;
use crate::carts::{CartStore, existing_user_key};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Session state for client boot.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub logged_in: bool,
    pub user_id: Option<VisitorId>,
    pub role: Option<Role>,
    pub tier: Option<MembershipTier>,
}

impl SessionView {
    fn logged_out() -> Self {
        Self {
            logged_in: false,
            user_id: None,
            role: None,
            tier: None,
        }
    }
}

impl From<&CurrentUser> for SessionView {
    fn from(user: &CurrentUser) -> Self {
        Self {
            logged_in: true,
            user_id: Some(user.id),
            role: Some(user.role),
            tier: Some(user.tier),
        }
    }
}

/// Handle login.
///
/// Verifies credentials against the backend, stores the session record, and
/// merges the pre-login cart into the visitor's persisted cart - additively,
/// so neither the guest picks nor the account's earlier items are lost.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionView>> {
    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let login = state
        .backend()
        .login(form.email.trim(), &form.password)
        .await
        .map_err(|e| match e {
            BackendError::Rejected(msg) => AppError::Unauthorized(msg),
            other => AppError::Backend(other),
        })?;

    let tier = login
        .membership
        .as_deref()
        .map_or(MembershipTier::None, MembershipTier::from_label);
    let user = CurrentUser {
        id: login.visitor_id,
        role: login.role,
        tier,
    };

    // The key the cart was under before this sign-in (guest, or a previous
    // account when switching users without signing out). None means this
    // session never touched a cart and there is nothing to merge.
    let source_key = existing_user_key(&session).await?;

    set_current_user(&session, &user).await?;

    if let Some(source_key) = source_key
        && source_key != user.user_key()
    {
        CartStore::new(state.kv(), source_key)
            .switch_user(user.user_key())
            .await?;
        // The guest key is spent; a later sign-out starts a fresh cart.
        session
            .remove::<String>(session_keys::GUEST_CART_KEY)
            .await?;
    }

    tracing::info!(visitor_id = %user.id, role = %user.role, "Visitor signed in");
    Ok(Json(SessionView::from(&user)))
}

/// Handle logout: clear the session record and destroy the session.
///
/// The visitor's cart stays persisted under their id, ready for the next
/// sign-in.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Report the current session state.
#[instrument(skip(user))]
pub async fn session_info(user: OptionalAuth) -> Json<SessionView> {
    Json(
        user.0
            .as_ref()
            .map_or_else(SessionView::logged_out, SessionView::from),
    )
}
