//! Order lifecycle management.
//!
//! [`OrderManager`] is the single place that enforces order-state rules and
//! coordinates the three collaborators behind trait seams:
//!
//! - [`OrderStore`]    — order persistence (Postgres in production,
//!   in-memory in tests).
//! - [`ProductLookup`] — catalog reads for price/stock/seller snapshots.
//! - [`PaymentGateway`] — charge/refund. The production implementation is a
//!   simulator; tests inject a deterministic gateway so no assertion relies
//!   on statistical sampling.
//!
//! The manager deliberately reproduces the known gaps of the system it
//! replaces: it never decrements catalog stock, the duplicate-payment guard
//! is read-then-write without atomicity, status updates are unguarded, and
//! the 2-day cancellation window is a client-side convention only.

pub mod error;
pub mod gateway;
pub mod lookup;
pub mod manager;
pub mod store;

pub use error::OrderError;
pub use gateway::{ChargeOutcome, PaymentGateway, RefundOutcome};
pub use lookup::{LookupError, ProductLookup};
pub use manager::{NewOrderItem, OrderManager, PaymentResult};
pub use store::OrderStore;
