//! Shared test doubles for scenario tests.
//!
//! [`MemoryOrderStore`] and [`StaticCatalog`] stand in for Postgres and the
//! product service so the daemon's router can be driven fully in-process.
//! The deterministic payment gateway lives in `mvd-payments` and is
//! re-exported here so scenario tests need only this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use mvd_orders::{LookupError, OrderStore, ProductLookup};
use mvd_schemas::{Order, Product, ShippingAddress};
use uuid::Uuid;

pub use mvd_payments::FixedGateway;

// ---------------------------------------------------------------------------
// MemoryOrderStore
// ---------------------------------------------------------------------------

/// In-memory [`OrderStore`] with the same observable contract as the
/// Postgres store: newest-first listing, update rewrites lifecycle fields.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    orders: Mutex<HashMap<Uuid, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        self.orders.lock().unwrap().insert(order.id, order.clone());
        Ok(())
    }

    async fn fetch(&self, order_id: Uuid) -> Result<Option<Order>> {
        Ok(self.orders.lock().unwrap().get(&order_id).cloned())
    }

    async fn list_for_customer(&self, customer_id: &str) -> Result<Vec<Order>> {
        let mut out: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn update(&self, order: &Order) -> Result<()> {
        let mut orders = self.orders.lock().unwrap();
        let existing = orders
            .get_mut(&order.id)
            .ok_or_else(|| anyhow::anyhow!("update: no order {}", order.id))?;
        existing.status = order.status;
        existing.payment_status = order.payment_status;
        existing.payment_id = order.payment_id.clone();
        existing.updated_at = order.updated_at;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StaticCatalog
// ---------------------------------------------------------------------------

/// Fixed product map implementing [`ProductLookup`].
#[derive(Debug, Default)]
pub struct StaticCatalog {
    products: HashMap<String, Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }
}

#[async_trait]
impl ProductLookup for StaticCatalog {
    async fn get_product(&self, product_id: &str) -> Result<Product, LookupError> {
        self.products
            .get(product_id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(product_id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

pub fn product(id: &str, price: i64, stock: i64) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {id}"),
        price,
        stock,
        seller_id: "seller-1".to_string(),
    }
}

pub fn shipping_address() -> ShippingAddress {
    ShippingAddress {
        street: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip_code: "62701".to_string(),
        country: "US".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use mvd_schemas::{OrderStatus, PaymentStatus};

    fn order_for(customer: &str, created_offset_secs: i64) -> Order {
        let created = Utc::now() + Duration::seconds(created_offset_secs);
        Order {
            id: Uuid::new_v4(),
            customer_id: customer.to_string(),
            items: vec![],
            total_amount: 0,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            shipping_address: shipping_address(),
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_customer_scoped() {
        let store = MemoryOrderStore::new();
        let older = order_for("u1", 0);
        let newer = order_for("u1", 10);
        let other = order_for("u2", 5);

        store.insert(&older).await.unwrap();
        store.insert(&newer).await.unwrap();
        store.insert(&other).await.unwrap();

        let listed = store.list_for_customer("u1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);
    }

    #[tokio::test]
    async fn update_rewrites_lifecycle_fields_only() {
        let store = MemoryOrderStore::new();
        let mut order = order_for("u1", 0);
        store.insert(&order).await.unwrap();

        order.status = OrderStatus::Confirmed;
        order.payment_status = PaymentStatus::Paid;
        order.payment_id = Some("pay_x".to_string());
        store.update(&order).await.unwrap();

        let stored = store.fetch(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Confirmed);
        assert_eq!(stored.payment_id.as_deref(), Some("pay_x"));
    }

    #[tokio::test]
    async fn updating_missing_order_errors() {
        let store = MemoryOrderStore::new();
        let order = order_for("u1", 0);
        assert!(store.update(&order).await.is_err());
    }
}
