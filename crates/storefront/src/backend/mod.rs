//! Zoo backend REST API client.
//!
//! The zoo's existing backend owns reference data (ticket types,
//! merchandise), credentials, and the order record. This client treats it as
//! a black box returning JSON: reference fetches, login, and the two payment
//! endpoints. Failures surface immediately to the caller - there is no retry
//! here, local state is left unchanged so the user can safely resubmit.
//!
//! Error responses arrive as `{ "error": "..." }` or `{ "message": "..." }`
//! bodies; both shapes are parsed before falling back to the HTTP status.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use briarwood_core::{OrderId, Role, VisitorId};

use crate::checkout::CheckoutKind;
use crate::config::BackendConfig;

/// Errors from the zoo backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the response not read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend rejected request: {0}")]
    Rejected(String),

    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// A request path could not be joined onto the base URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// =============================================================================
// Wire types
// =============================================================================

/// A purchasable ticket type (reference data).
///
/// Serializes too: the catalog routes relay these to the browser unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketType {
    pub id: String,
    pub name: String,
    /// Amount as a decimal string, e.g. `"25.00"`.
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

/// A gift shop merchandise item (reference data).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchandiseItem {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub visitor_id: VisitorId,
    pub role: Role,
    /// Membership tier label; absent for visitors without a membership.
    #[serde(default)]
    pub membership: Option<String>,
}

/// One line of a payment submission.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Payload for the payment endpoints.
#[derive(Debug, Serialize)]
pub struct PaymentRequest {
    pub visitor_id: VisitorId,
    pub items: Vec<PaymentItem>,
}

/// Successful payment acknowledgement.
///
/// The backend's order is the system of record; the storefront only relays
/// the id for the confirmation page.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentReceipt {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Shape of backend error bodies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the zoo backend REST API.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Verify credentials against the backend.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] for bad credentials, or the usual
    /// transport/shape errors.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, BackendError> {
        let url = self.endpoint("/api/login")?;
        let response = self
            .inner
            .client
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        read_json(response).await
    }

    /// Fetch the purchasable ticket types.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the fetch fails.
    #[instrument(skip(self))]
    pub async fn ticket_types(&self) -> Result<Vec<TicketType>, BackendError> {
        let url = self.endpoint("/api/tickets/types")?;
        let response = self.inner.client.get(url).send().await?;
        read_json(response).await
    }

    /// Fetch the gift shop merchandise.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the fetch fails.
    #[instrument(skip(self))]
    pub async fn merchandise(&self) -> Result<Vec<MerchandiseItem>, BackendError> {
        let url = self.endpoint("/api/shop/items")?;
        let response = self.inner.client.get(url).send().await?;
        read_json(response).await
    }

    /// Submit a payment to the endpoint matching the checkout kind.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] when the backend declines the
    /// payment; nothing is partially applied on failure.
    #[instrument(skip(self, request), fields(visitor_id = %request.visitor_id))]
    pub async fn submit_payment(
        &self,
        kind: CheckoutKind,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, BackendError> {
        let path = match kind {
            CheckoutKind::Tickets => "/api/tickets/payment",
            CheckoutKind::Shop => "/api/shop/payment",
        };
        let url = self.endpoint(path)?;
        let response = self.inner.client.post(url).json(request).send().await?;
        read_json(response).await
    }
}

/// Read a JSON body, mapping non-success statuses to `Rejected`.
///
/// The body is read as text first so a failed parse can report what the
/// backend actually sent.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(BackendError::Rejected(extract_error_message(
            status.as_u16(),
            &text,
        )));
    }

    serde_json::from_str(&text).map_err(|e| {
        BackendError::InvalidResponse(format!(
            "{e} (body: {})",
            text.chars().take(200).collect::<String>()
        ))
    })
}

/// Pull a human-readable message out of an error body.
fn extract_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| format!("backend returned status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message_error_field() {
        assert_eq!(
            extract_error_message(400, r#"{"error":"invalid visitor"}"#),
            "invalid visitor"
        );
    }

    #[test]
    fn test_extract_error_message_message_field() {
        assert_eq!(
            extract_error_message(402, r#"{"message":"card declined"}"#),
            "card declined"
        );
    }

    #[test]
    fn test_extract_error_message_falls_back_to_status() {
        assert_eq!(
            extract_error_message(500, "<html>oops</html>"),
            "backend returned status 500"
        );
    }

    #[test]
    fn test_login_response_parses_with_optional_membership() {
        let json = r#"{"visitor_id": 42, "role": "visitor"}"#;
        let parsed: LoginResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.visitor_id, VisitorId::new(42));
        assert_eq!(parsed.role, Role::Visitor);
        assert_eq!(parsed.membership, None);

        let json = r#"{"visitor_id": 7, "role": "manager", "membership": "gold"}"#;
        let parsed: LoginResponse = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.membership.as_deref(), Some("gold"));
    }

    #[test]
    fn test_ticket_type_parses_string_price() {
        let json = r#"[{"id": "day-pass", "name": "Day Pass", "price": "25.00"}]"#;
        let parsed: Vec<TicketType> = serde_json::from_str(json).expect("parse");
        assert_eq!(parsed.first().map(|t| t.price), Some(Decimal::new(2500, 2)));
    }

    #[test]
    fn test_payment_request_wire_shape() {
        let request = PaymentRequest {
            visitor_id: VisitorId::new(42),
            items: vec![PaymentItem {
                id: "plush-otter".to_string(),
                name: "Plush Otter".to_string(),
                quantity: 2,
                unit_price: Decimal::new(1299, 2),
            }],
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["visitor_id"], 42);
        assert_eq!(json["items"][0]["quantity"], 2);
        // Amounts travel as decimal strings.
        assert_eq!(json["items"][0]["unit_price"], "12.99");
    }
}
