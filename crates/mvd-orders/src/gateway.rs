//! Payment seam.
//!
//! Outcomes are plain values, not `Result`s: a declined charge is a normal
//! answer from the gateway, and even "gateway unavailable" is folded into
//! `success = false` with a message. The production implementation is an
//! explicit stand-in for a real payment processor and carries no financial
//! guarantees.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Result of a charge attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeOutcome {
    pub success: bool,
    /// Set only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub message: String,
}

/// Result of a refund attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_id: Option<String>,
    pub message: String,
}

// ---------------------------------------------------------------------------
// PaymentGateway
// ---------------------------------------------------------------------------

/// Charge and refund capability, amounts in minor currency units.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, amount: i64) -> ChargeOutcome;

    async fn refund(&self, payment_id: &str, amount: i64) -> RefundOutcome;
}

#[async_trait]
impl<T: PaymentGateway + ?Sized> PaymentGateway for Arc<T> {
    async fn charge(&self, amount: i64) -> ChargeOutcome {
        (**self).charge(amount).await
    }

    async fn refund(&self, payment_id: &str, amount: i64) -> RefundOutcome {
        (**self).refund(payment_id, amount).await
    }
}
