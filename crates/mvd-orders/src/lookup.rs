//! Catalog seam: synchronous capability interface for product reads.
//!
//! Failures are an explicit result type rather than a thrown transport
//! error; order creation treats either variant as "this item cannot be
//! ordered" and aborts the whole order.

use async_trait::async_trait;
use mvd_schemas::Product;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// LookupError
// ---------------------------------------------------------------------------

/// Why a product could not be fetched from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The catalog answered with a non-success status for this id.
    NotFound(String),
    /// The catalog was unreachable or returned an undecodable payload.
    Unavailable(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NotFound(id) => write!(f, "product not found: {id}"),
            LookupError::Unavailable(msg) => write!(f, "catalog unavailable: {msg}"),
        }
    }
}

impl std::error::Error for LookupError {}

// ---------------------------------------------------------------------------
// ProductLookup
// ---------------------------------------------------------------------------

/// Read a product's current price/stock/seller from the catalog.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    async fn get_product(&self, product_id: &str) -> Result<Product, LookupError>;
}

#[async_trait]
impl<T: ProductLookup + ?Sized> ProductLookup for Arc<T> {
    async fn get_product(&self, product_id: &str) -> Result<Product, LookupError> {
        (**self).get_product(product_id).await
    }
}
