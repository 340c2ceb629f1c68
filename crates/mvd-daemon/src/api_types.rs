//! Request and response types for all mvd-daemon HTTP endpoints.
//!
//! Wire names are camelCase for compatibility with the existing frontend.
//! No business logic lives here.

use chrono::{DateTime, Utc};
use mvd_orders::ChargeOutcome;
use mvd_schemas::{Order, ShippingAddress};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// POST /orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
}

// ---------------------------------------------------------------------------
// PUT /orders/:id/status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Success envelopes
// ---------------------------------------------------------------------------

/// `{message, order}` — create / cancel / status-update responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEnvelope {
    pub message: String,
    pub order: Order,
}

/// `{message, order, paymentDetails}` — successful payment response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEnvelope {
    pub message: String,
    pub order: Order,
    pub payment_details: ChargeOutcome,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Every error response is `{"message": …}`, optionally with gateway detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
