//! Payment gateway implementations.
//!
//! [`SimulatedGateway`] is the production stand-in for a real payment
//! processor: randomized charge outcomes, always-successful refunds, and an
//! artificial delay before resolving. It carries no financial guarantees.
//!
//! [`FixedGateway`] is the deterministic counterpart for tests: scripted
//! outcome, zero delay, call counters. Tests force success or failure
//! through it instead of sampling the simulator's distribution.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mvd_orders::{ChargeOutcome, PaymentGateway, RefundOutcome};
use tracing::debug;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// SimulatedGateway
// ---------------------------------------------------------------------------

/// Randomized payment simulator.
///
/// A charge succeeds when a uniform draw lands above `failure_rate`
/// (default 0.10, i.e. ~90% success). The outcome is independent of the
/// amount. Refunds always succeed. Both calls sleep for their configured
/// delay first, which simply blocks the one request being handled.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    failure_rate: f32,
    charge_delay: Duration,
    refund_delay: Duration,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self {
            failure_rate: 0.10,
            charge_delay: Duration::from_millis(1000),
            refund_delay: Duration::from_millis(500),
        }
    }
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the failure rate and delays. `failure_rate` of 0.0 or 1.0
    /// makes the simulator deterministic.
    pub fn with_tuning(failure_rate: f32, charge_delay: Duration, refund_delay: Duration) -> Self {
        Self {
            failure_rate,
            charge_delay,
            refund_delay,
        }
    }
}

/// Short opaque id with the given prefix, e.g. `pay_6f9c2d41a`.
fn simulated_id(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &raw[..9])
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, amount: i64) -> ChargeOutcome {
        tokio::time::sleep(self.charge_delay).await;

        let draw: f32 = rand::random();
        if draw < self.failure_rate {
            debug!(amount, "simulated charge declined");
            return ChargeOutcome {
                success: false,
                payment_id: None,
                message: "Payment failed - insufficient funds".to_string(),
            };
        }

        let payment_id = simulated_id("pay");
        debug!(amount, %payment_id, "simulated charge approved");
        ChargeOutcome {
            success: true,
            payment_id: Some(payment_id),
            message: "Payment processed successfully".to_string(),
        }
    }

    async fn refund(&self, _payment_id: &str, amount: i64) -> RefundOutcome {
        tokio::time::sleep(self.refund_delay).await;

        let refund_id = simulated_id("ref");
        debug!(amount, %refund_id, "simulated refund issued");
        RefundOutcome {
            success: true,
            refund_id: Some(refund_id),
            message: "Refund processed successfully".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// FixedGateway
// ---------------------------------------------------------------------------

/// Deterministic gateway for tests: no delay, no randomness.
///
/// The charge outcome is fixed at construction; refunds always succeed.
/// Invocation counters let tests assert "exactly one call" semantics.
#[derive(Debug)]
pub struct FixedGateway {
    charge_succeeds: bool,
    charges: AtomicU32,
    refunds: AtomicU32,
}

impl FixedGateway {
    pub fn approving() -> Self {
        Self::new(true)
    }

    pub fn declining() -> Self {
        Self::new(false)
    }

    fn new(charge_succeeds: bool) -> Self {
        Self {
            charge_succeeds,
            charges: AtomicU32::new(0),
            refunds: AtomicU32::new(0),
        }
    }

    pub fn charge_calls(&self) -> u32 {
        self.charges.load(Ordering::SeqCst)
    }

    pub fn refund_calls(&self) -> u32 {
        self.refunds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FixedGateway {
    async fn charge(&self, _amount: i64) -> ChargeOutcome {
        self.charges.fetch_add(1, Ordering::SeqCst);
        if self.charge_succeeds {
            ChargeOutcome {
                success: true,
                payment_id: Some("pay_fixed0001".to_string()),
                message: "Payment processed successfully".to_string(),
            }
        } else {
            ChargeOutcome {
                success: false,
                payment_id: None,
                message: "Payment failed - insufficient funds".to_string(),
            }
        }
    }

    async fn refund(&self, _payment_id: &str, _amount: i64) -> RefundOutcome {
        self.refunds.fetch_add(1, Ordering::SeqCst);
        RefundOutcome {
            success: true,
            refund_id: Some("ref_fixed0001".to_string()),
            message: "Refund processed successfully".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
