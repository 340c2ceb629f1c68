//! Shared domain types for the MultiVend order service.
//!
//! Wire names are camelCase to stay compatible with the documents the other
//! services (user, product, frontend) already exchange. No business logic
//! lives here beyond status parsing and the delivery-window arithmetic.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// OrderStatus
// ---------------------------------------------------------------------------

/// Fulfilment status of an order.
///
/// `Delivered` and `Cancelled` are terminal. Note that apart from the
/// cancel-eligibility check in the lifecycle manager, transitions are NOT
/// validated: the status-update operation permits arbitrary jumps, including
/// backwards. Tightening this would change observable behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the lowercase wire form. `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    /// Returns `true` if no further transitions are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

// ---------------------------------------------------------------------------
// PaymentStatus
// ---------------------------------------------------------------------------

/// Payment status of an order, tracked independently of fulfilment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ShippingAddress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

// ---------------------------------------------------------------------------
// OrderItem
// ---------------------------------------------------------------------------

/// One product+quantity line within an order.
///
/// The `*Snapshot` fields are captured from the catalog at order-creation
/// time and never refreshed: an order's displayed item details must not
/// change even if the underlying product changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    /// Always >= 1; validated by the lifecycle manager at creation.
    pub quantity: i64,
    /// Unit price in minor currency units at creation time.
    pub unit_price_snapshot: i64,
    /// `unit_price_snapshot * quantity`.
    pub line_total: i64,
    pub product_name_snapshot: String,
    pub seller_id_snapshot: String,
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// An order document.
///
/// Invariant: `total_amount` equals the sum of all `line_total`s at all
/// times. Items and total are immutable after creation; only statuses,
/// `payment_id`, and `updated_at` change over the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    /// Minor currency units.
    pub total_amount: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Set only once a charge succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Orders auto-deliver this long after creation (client-side convention).
pub fn auto_delivery_window() -> Duration {
    Duration::days(2)
}

impl Order {
    /// When the order is considered delivered by the auto-delivery convention.
    pub fn auto_delivery_at(&self) -> DateTime<Utc> {
        self.created_at + auto_delivery_window()
    }

    /// Whether the client-side cancellation window is still open at `now`.
    ///
    /// Advisory: the lifecycle manager does NOT enforce this window
    /// server-side. It exists so API consumers share one arithmetic with the
    /// frontend instead of re-deriving the 2-day rule.
    pub fn within_cancellation_window(&self, now: DateTime<Utc>) -> bool {
        !self.status.is_terminal() && now < self.auto_delivery_at()
    }
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A product record as seen by this service: the subset of the catalog
/// document that order creation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Unit price in minor currency units.
    pub price: i64,
    pub stock: i64,
    pub seller_id: String,
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
