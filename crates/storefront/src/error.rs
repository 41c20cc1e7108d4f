//! Unified error handling for the storefront API.
//!
//! Provides a unified `AppError` type rendered as the `{ "error": ... }`
//! JSON body the console's clients expect. All route handlers return
//! `Result<T, AppError>`; every failure is handled at this boundary, none
//! propagate as panics.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use briarwood_core::CartError;

use crate::backend::BackendError;
use crate::carts::CartStoreError;
use crate::db::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Durable storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Zoo backend REST call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// An item failed validation entering the cart.
    #[error("Invalid item: {0}")]
    InvalidItem(#[from] CartError),

    /// Checkout attempted without a signed-in user.
    #[error("Sign in required")]
    AuthRequired,

    /// Credentials were rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Payment route entered with no pending checkout snapshot.
    ///
    /// The client redirects back to the cart rather than rendering broken
    /// state.
    #[error("No pending checkout")]
    NoPendingCheckout,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CartStoreError> for AppError {
    fn from(err: CartStoreError) -> Self {
        match err {
            CartStoreError::Storage(e) => Self::Storage(e),
            CartStoreError::Item(e) => Self::InvalidItem(e),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Storage(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Backend(err) => match err {
                BackendError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::InvalidItem(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::AuthRequired | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NoPendingCheckout | Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> String {
        match self {
            // Don't expose internal error details to clients
            Self::Storage(_) | Self::Session(_) | Self::Internal(_) => {
                "internal server error".to_string()
            }
            Self::Backend(err) => match err {
                BackendError::Rejected(msg) => msg.clone(),
                _ => "zoo service unavailable".to_string(),
            },
            Self::InvalidItem(err) => err.to_string(),
            Self::AuthRequired => "sign in required".to_string(),
            Self::Unauthorized(msg) => msg.clone(),
            Self::NoPendingCheckout => "no pending checkout".to_string(),
            Self::NotFound(what) => format!("not found: {what}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            Self::Storage(_) | Self::Session(_) | Self::Internal(_) | Self::Backend(_)
        ) {
            tracing::error!(error = %self, "Request error");
        }

        let status = self.status();
        let body = Json(json!({ "error": self.message() }));
        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
