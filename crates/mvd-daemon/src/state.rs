//! Shared daemon state.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. Collaborators are held
//! as trait objects so production wiring (Postgres, HTTP catalog, simulator)
//! and scenario tests (in-memory doubles, fixed gateway) share one router.

use std::sync::Arc;

use mvd_orders::{OrderManager, OrderStore, PaymentGateway, ProductLookup};

use crate::auth::TokenVerifier;

/// The manager as wired into the daemon: trait-object collaborators.
pub type DynOrderManager =
    OrderManager<Arc<dyn OrderStore>, Arc<dyn ProductLookup>, Arc<dyn PaymentGateway>>;

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

/// Cloneable (Arc) handle shared across all Axum handlers.
pub struct AppState {
    pub manager: DynOrderManager,
    pub verifier: TokenVerifier,
    pub build: BuildInfo,
}

impl AppState {
    pub fn new(
        store: Arc<dyn OrderStore>,
        lookup: Arc<dyn ProductLookup>,
        gateway: Arc<dyn PaymentGateway>,
        auth_secret: &str,
    ) -> Self {
        Self {
            manager: OrderManager::new(store, lookup, gateway),
            verifier: TokenVerifier::new(auth_secret),
            build: BuildInfo {
                service: "mvd-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
        }
    }
}
