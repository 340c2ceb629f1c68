//! The Order Lifecycle Manager.
//!
//! One manager instance is shared by all request handlers. Each operation is
//! an independent read-modify-write against the store; there is no locking
//! between concurrent requests touching the same order, and the
//! duplicate-payment guard is a plain read-then-write check. Stock is never
//! decremented here: the original system leaves stock adjustment to the
//! caller/UI layer as a best-effort follow-up.

use chrono::Utc;
use mvd_schemas::{Order, OrderItem, OrderStatus, PaymentStatus, Product, ShippingAddress};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::OrderError,
    gateway::{ChargeOutcome, PaymentGateway},
    lookup::ProductLookup,
    store::OrderStore,
};

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// One requested line of a new order: product reference plus quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: String,
    pub quantity: i64,
}

/// Outcome of a payment attempt. A declined charge is not an error: the
/// order was updated (`payment_status = failed`) and callers surface the
/// gateway message alongside it.
#[derive(Debug, Clone)]
pub enum PaymentResult {
    Approved {
        order: Order,
        details: ChargeOutcome,
    },
    Declined {
        order: Order,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// OrderManager
// ---------------------------------------------------------------------------

/// Coordinates order creation, payment, cancellation, and status updates.
pub struct OrderManager<S, L, G>
where
    S: OrderStore,
    L: ProductLookup,
    G: PaymentGateway,
{
    store: S,
    lookup: L,
    gateway: G,
}

impl<S, L, G> OrderManager<S, L, G>
where
    S: OrderStore,
    L: ProductLookup,
    G: PaymentGateway,
{
    pub fn new(store: S, lookup: L, gateway: G) -> Self {
        Self {
            store,
            lookup,
            gateway,
        }
    }

    /// Create a new order in `pending`/`pending` state.
    ///
    /// Every item is validated against the catalog before anything is
    /// persisted: a failed lookup or insufficient stock aborts the whole
    /// order naming the offending product, so no partial order ever exists.
    /// Snapshots (name, unit price, seller) are captured here and never
    /// refreshed. Stock is NOT decremented.
    pub async fn create_order(
        &self,
        customer_id: &str,
        items: &[NewOrderItem],
        shipping_address: ShippingAddress,
    ) -> Result<Order, OrderError> {
        if items.is_empty() {
            return Err(OrderError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }

        let mut order_items: Vec<OrderItem> = Vec::with_capacity(items.len());
        let mut total_amount: i64 = 0;

        for item in items {
            if item.quantity < 1 {
                return Err(OrderError::Validation(format!(
                    "Invalid quantity for product: {}",
                    item.product_id
                )));
            }

            let product: Product = match self.lookup.get_product(&item.product_id).await {
                Ok(p) => p,
                Err(err) => {
                    info!(product_id = %item.product_id, %err, "product lookup failed");
                    return Err(OrderError::Dependency(format!(
                        "Product not found or unavailable: {}",
                        item.product_id
                    )));
                }
            };

            if product.stock < item.quantity {
                return Err(OrderError::Conflict(format!(
                    "Insufficient stock for product: {}",
                    product.name
                )));
            }

            let line_total = product.price * item.quantity;
            total_amount += line_total;

            order_items.push(OrderItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price_snapshot: product.price,
                line_total,
                product_name_snapshot: product.name,
                seller_id_snapshot: product.seller_id,
            });
        }

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: customer_id.to_string(),
            items: order_items,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            shipping_address,
            created_at: now,
            updated_at: now,
        };

        self.store.insert(&order).await.map_err(OrderError::internal)?;

        info!(order_id = %order.id, total_amount, "order created");
        Ok(order)
    }

    /// Charge the order's total via the payment gateway.
    ///
    /// The duplicate-payment check happens before the gateway is invoked, so
    /// an already-paid order never produces a second charge call. The check
    /// is read-then-write: two concurrent attempts on the same order can
    /// both pass it (known double-charge race, preserved).
    pub async fn process_payment(
        &self,
        order_id: Uuid,
        caller_id: &str,
    ) -> Result<PaymentResult, OrderError> {
        let mut order = self.fetch_owned(order_id, caller_id).await?;

        if order.payment_status == PaymentStatus::Paid {
            return Err(OrderError::Conflict("Order already paid".to_string()));
        }

        let outcome = self.gateway.charge(order.total_amount).await;
        order.updated_at = Utc::now();

        if outcome.success {
            order.payment_status = PaymentStatus::Paid;
            order.status = OrderStatus::Confirmed;
            order.payment_id = outcome.payment_id.clone();
            self.store.update(&order).await.map_err(OrderError::internal)?;

            info!(order_id = %order.id, payment_id = ?order.payment_id, "payment approved");
            Ok(PaymentResult::Approved {
                order,
                details: outcome,
            })
        } else {
            order.payment_status = PaymentStatus::Failed;
            self.store.update(&order).await.map_err(OrderError::internal)?;

            warn!(order_id = %order.id, message = %outcome.message, "payment declined");
            Ok(PaymentResult::Declined {
                order,
                message: outcome.message,
            })
        }
    }

    /// Cancel an order.
    ///
    /// Refused once the order is `delivered` or `cancelled`. A previously
    /// paid order gets exactly one refund attempt; on refund success the
    /// payment status becomes `refunded`, on failure it stays `paid`. The
    /// order is cancelled regardless of the refund outcome. The 2-day
    /// delivery window is NOT checked here (client-side convention only).
    pub async fn cancel_order(&self, order_id: Uuid, caller_id: &str) -> Result<Order, OrderError> {
        let mut order = self.fetch_owned(order_id, caller_id).await?;

        if order.status.is_terminal() {
            return Err(OrderError::Conflict("Cannot cancel this order".to_string()));
        }

        if order.payment_status == PaymentStatus::Paid {
            let payment_id = order.payment_id.clone().unwrap_or_default();
            let refund = self.gateway.refund(&payment_id, order.total_amount).await;
            if refund.success {
                order.payment_status = PaymentStatus::Refunded;
                info!(order_id = %order.id, refund_id = ?refund.refund_id, "refund issued");
            } else {
                warn!(order_id = %order.id, message = %refund.message, "refund failed");
            }
        }

        order.status = OrderStatus::Cancelled;
        order.updated_at = Utc::now();
        self.store.update(&order).await.map_err(OrderError::internal)?;

        info!(order_id = %order.id, "order cancelled");
        Ok(order)
    }

    /// Set an order's status from its wire string.
    ///
    /// No ownership check and no transition validation: any authenticated
    /// caller may move any order to any of the six statuses, including
    /// backwards. Tightening either would change observable behavior.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: &str,
    ) -> Result<Order, OrderError> {
        let status = OrderStatus::parse(new_status)
            .ok_or_else(|| OrderError::Conflict("Invalid status".to_string()))?;

        let mut order = self
            .store
            .fetch(order_id)
            .await
            .map_err(OrderError::internal)?
            .ok_or_else(|| OrderError::NotFound("Order not found".to_string()))?;

        order.status = status;
        order.updated_at = Utc::now();
        self.store.update(&order).await.map_err(OrderError::internal)?;

        info!(order_id = %order.id, status = status.as_str(), "order status updated");
        Ok(order)
    }

    /// Fetch one order, enforcing ownership.
    pub async fn get_order(&self, order_id: Uuid, caller_id: &str) -> Result<Order, OrderError> {
        self.fetch_owned(order_id, caller_id).await
    }

    /// All orders belonging to `customer_id`, newest first.
    pub async fn list_orders(&self, customer_id: &str) -> Result<Vec<Order>, OrderError> {
        self.store
            .list_for_customer(customer_id)
            .await
            .map_err(OrderError::internal)
    }

    async fn fetch_owned(&self, order_id: Uuid, caller_id: &str) -> Result<Order, OrderError> {
        let order = self
            .store
            .fetch(order_id)
            .await
            .map_err(OrderError::internal)?
            .ok_or_else(|| OrderError::NotFound("Order not found".to_string()))?;

        if order.customer_id != caller_id {
            return Err(OrderError::Forbidden("Access denied".to_string()));
        }

        Ok(order)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
