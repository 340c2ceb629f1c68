//! Postgres-backed order store.
//!
//! Orders persist as one row each: scalar lifecycle fields are real columns
//! (so listing and the check constraints work), while `items` and
//! `shipping_address` stay JSONB documents. `update` rewrites only the
//! mutable fields — items, total, and address are immutable after creation.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mvd_orders::OrderStore;
use mvd_schemas::{Order, OrderStatus, PaymentStatus};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub const ENV_DB_URL: &str = "MVD_DATABASE_URL";

/// Connect to Postgres using MVD_DATABASE_URL.
pub async fn connect_from_env() -> Result<PgPool> {
    let url = std::env::var(ENV_DB_URL)
        .with_context(|| format!("missing env var {ENV_DB_URL}"))?;
    connect(&url).await
}

pub async fn connect(url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(url)
        .await
        .context("failed to connect to Postgres")?;
    Ok(pool)
}

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// PgOrderStore
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        let items = serde_json::to_value(&order.items).context("encode order items")?;
        let address =
            serde_json::to_value(&order.shipping_address).context("encode shipping address")?;

        sqlx::query(
            r#"
            insert into orders (
              order_id, customer_id, items, total_amount,
              status, payment_status, payment_id,
              shipping_address, created_at, updated_at
            ) values (
              $1, $2, $3, $4, $5, $6, $7, $8, $9, $10
            )
            "#,
        )
        .bind(order.id)
        .bind(&order.customer_id)
        .bind(&items)
        .bind(order.total_amount)
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(&order.payment_id)
        .bind(&address)
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .context("insert order failed")?;

        Ok(())
    }

    async fn fetch(&self, order_id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query("select * from orders where order_id = $1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .context("fetch order failed")?;

        row.map(|r| row_to_order(&r)).transpose()
    }

    async fn list_for_customer(&self, customer_id: &str) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "select * from orders where customer_id = $1 order by created_at desc",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .context("list orders failed")?;

        rows.iter().map(row_to_order).collect()
    }

    async fn update(&self, order: &Order) -> Result<()> {
        // Only lifecycle fields change; snapshots stay as inserted.
        let result = sqlx::query(
            r#"
            update orders
               set status = $2,
                   payment_status = $3,
                   payment_id = $4,
                   updated_at = $5
             where order_id = $1
            "#,
        )
        .bind(order.id)
        .bind(order.status.as_str())
        .bind(order.payment_status.as_str())
        .bind(&order.payment_id)
        .bind(order.updated_at)
        .execute(&self.pool)
        .await
        .context("update order failed")?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("update order: no row for {}", order.id));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

fn row_to_order(row: &PgRow) -> Result<Order> {
    let status_s: String = row.try_get("status")?;
    let status = OrderStatus::parse(&status_s)
        .ok_or_else(|| anyhow!("unknown order status in db: {status_s}"))?;

    let payment_s: String = row.try_get("payment_status")?;
    let payment_status = PaymentStatus::parse(&payment_s)
        .ok_or_else(|| anyhow!("unknown payment status in db: {payment_s}"))?;

    let items: serde_json::Value = row.try_get("items")?;
    let address: serde_json::Value = row.try_get("shipping_address")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(Order {
        id: row.try_get("order_id")?,
        customer_id: row.try_get("customer_id")?,
        items: serde_json::from_value(items).context("decode order items")?,
        total_amount: row.try_get("total_amount")?,
        status,
        payment_status,
        payment_id: row.try_get("payment_id")?,
        shipping_address: serde_json::from_value(address).context("decode shipping address")?,
        created_at,
        updated_at,
    })
}
