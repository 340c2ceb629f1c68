//! Persistence seam for order documents.

use anyhow::Result;
use async_trait::async_trait;
use mvd_schemas::Order;
use std::sync::Arc;
use uuid::Uuid;

/// Order persistence.
///
/// # Contract
/// - `insert` persists a brand-new document; ids are unique so re-insertion
///   of the same id is a caller bug, not a supported upsert.
/// - `update` rewrites the mutable fields of an existing document (`status`,
///   `payment_status`, `payment_id`, `updated_at`). Items, totals, and the
///   shipping address are immutable after creation and implementations must
///   not rewrite them.
/// - `list_for_customer` returns the customer's orders newest-first.
/// - Individual document writes are serialized by the backing store; nothing
///   here provides cross-call atomicity.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<()>;

    async fn fetch(&self, order_id: Uuid) -> Result<Option<Order>>;

    async fn list_for_customer(&self, customer_id: &str) -> Result<Vec<Order>>;

    async fn update(&self, order: &Order) -> Result<()>;
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn insert(&self, order: &Order) -> Result<()> {
        (**self).insert(order).await
    }

    async fn fetch(&self, order_id: Uuid) -> Result<Option<Order>> {
        (**self).fetch(order_id).await
    }

    async fn list_for_customer(&self, customer_id: &str) -> Result<Vec<Order>> {
        (**self).list_for_customer(customer_id).await
    }

    async fn update(&self, order: &Order) -> Result<()> {
        (**self).update(order).await
    }
}
