//! # Order Repository
//!
//! The order engine and order administration.
//!
//! ## Order Placement Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    place_order(user_id, request)                        │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   │                                                                     │
//! │   ├─► INSERT orders (total 0, 'Pending')   ← takes the write lock      │
//! │   │                                                                     │
//! │   ├─► for each line:                                                    │
//! │   │     SELECT product                                                  │
//! │   │       missing / deleted? ──► skip                                   │
//! │   │     INSERT order_items (qty, unit_price snapshot)                   │
//! │   │     total += price × qty                                            │
//! │   │     UPDATE stock = MAX(stock - qty, 0)                              │
//! │   │                                                                     │
//! │   ├─► UPDATE orders SET total                                           │
//! │   │                                                                     │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction → ROLLBACK.              │
//! │  No order, item, or stock change is ever half-visible.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Concurrent placements serialize on SQLite's single writer lock; the
//! pool's busy timeout makes later writers wait instead of failing.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::product::like_pattern;
use storefront_core::order::{add_line, line_total};
use storefront_core::{
    Money, Order, OrderExportRow, OrderItem, OrderRequest, OrderStatus, OrderSummary, Page,
    PageRequest,
};

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    total_cents: i64,
    status: String,
    shipping_address: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            user_id: row.user_id,
            total_cents: row.total_cents,
            status: OrderStatus::from(row.status),
            shipping_address: row.shipping_address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    unit_price_cents: i64,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        OrderItem {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
        }
    }
}

/// Order joined with its owner's email.
#[derive(Debug, sqlx::FromRow)]
struct OrderWithEmailRow {
    id: i64,
    user_email: Option<String>,
    total_cents: i64,
    status: String,
    shipping_address: Option<String>,
    created_at: DateTime<Utc>,
}

/// The product columns the engine needs inside the transaction.
#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    price_cents: i64,
    deleted: bool,
}

/// Admin order listing filter.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Case-insensitive substring of the owner's email.
    pub q: Option<String>,
    /// Exact status match.
    pub status: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order atomically and returns its id.
    ///
    /// ## Behavior
    /// - Lines naming a missing or soft-deleted product are skipped; an
    ///   order whose lines are all skipped is still created, with total 0.
    /// - Each item snapshots the product's current price.
    /// - Stock is decremented with a zero floor. Asking for more than is on
    ///   hand is not an error.
    ///
    /// ## Errors
    /// * `DbError::*` - any storage failure; nothing was written
    pub async fn place_order(&self, user_id: i64, request: &OrderRequest) -> DbResult<i64> {
        debug!(user_id, lines = request.lines().len(), "Placing order");

        let mut tx = self.pool.begin().await?;

        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (user_id, total_cents, status, shipping_address, created_at) \
             VALUES (?1, 0, ?2, ?3, ?4) RETURNING id",
        )
        .bind(user_id)
        .bind(OrderStatus::Pending.as_str())
        .bind(request.shipping_address())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        let mut total = Money::zero();
        let mut placed = 0usize;

        for line in request.lines() {
            let product = sqlx::query_as::<_, StockRow>(
                "SELECT price_cents, deleted FROM products WHERE id = ?1",
            )
            .bind(line.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            let unit_price = match product {
                Some(p) if !p.deleted => Money::from_cents(p.price_cents),
                _ => {
                    debug!(order_id, product_id = line.product_id, "Skipping unavailable product");
                    continue;
                }
            };

            total = add_line(total, line_total(unit_price, line.qty)?)?;

            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price_cents) \
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.qty)
            .bind(unit_price.cents())
            .execute(&mut *tx)
            .await?;


            sqlx::query("UPDATE products SET stock = MAX(stock - ?2, 0) WHERE id = ?1")
                .bind(line.product_id)
                .bind(line.qty)
                .execute(&mut *tx)
                .await?;

            placed += 1;
        }

        sqlx::query("UPDATE orders SET total_cents = ?2 WHERE id = ?1")
            .bind(order_id)
            .bind(total.cents())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            order_id,
            user_id,
            items = placed,
            total_cents = total.cents(),
            "Order placed"
        );
        Ok(order_id)
    }

    /// Gets an order by id.
    pub async fn get_order(&self, id: i64) -> DbResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, total_cents, status, shipping_address, created_at \
             FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Order::from))
    }

    /// Gets the items of an order, in insertion order.
    pub async fn get_items(&self, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, quantity, unit_price_cents \
             FROM order_items WHERE order_id = ?1 ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    /// Lists orders newest first, optionally filtered by exact status and
    /// by a substring of the owner's email.
    pub async fn list_orders(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> DbResult<Page<OrderSummary>> {
        let status = non_blank(filter.status.as_deref());
        let pattern = non_blank(filter.q.as_deref()).map(like_pattern);

        debug!(status = ?status, q = ?filter.q, page = page.page(), "Listing orders");

        const FROM: &str = "FROM orders o LEFT JOIN users u ON u.id = o.user_id \
             WHERE (?1 IS NULL OR o.status = ?1) \
             AND (?2 IS NULL OR u.email LIKE ?2 ESCAPE '\\')";

        let rows = sqlx::query_as::<_, OrderWithEmailRow>(&format!(
            "SELECT o.id, u.email AS user_email, o.total_cents, o.status, \
                    o.shipping_address, o.created_at \
             {FROM} ORDER BY o.created_at DESC, o.id DESC LIMIT ?3 OFFSET ?4"
        ))
        .bind(status)
        .bind(pattern.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) {FROM}"))
            .bind(status)
            .bind(pattern.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(|row| OrderSummary {
                id: row.id,
                user_email: row.user_email.unwrap_or_default(),
                total_cents: row.total_cents,
                status: OrderStatus::from(row.status),
                created_at: row.created_at,
            })
            .collect();

        Ok(Page { items, total })
    }

    /// Sets an order's status and returns the resulting status.
    ///
    /// `None` (or a blank string) keeps the current status.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no order with this id
    pub async fn update_status(&self, id: i64, status: Option<&str>) -> DbResult<OrderStatus> {
        let status = non_blank(status);

        let current: Option<String> = sqlx::query_scalar(
            "UPDATE orders SET status = COALESCE(?2, status) WHERE id = ?1 RETURNING status",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        let current = current.ok_or_else(|| DbError::not_found("Order", id))?;

        info!(order_id = id, status = %current, "Order status updated");
        Ok(OrderStatus::from(current))
    }

    /// Rows for CSV export, oldest first. An empty `ids` slice exports
    /// every order; unknown ids are ignored.
    pub async fn export_rows(&self, ids: &[i64]) -> DbResult<Vec<OrderExportRow>> {
        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT o.id, u.email AS user_email, o.total_cents, o.status, \
                    o.shipping_address, o.created_at \
             FROM orders o LEFT JOIN users u ON u.id = o.user_id",
        );

        if !ids.is_empty() {
            builder.push(" WHERE o.id IN (");
            let mut separated = builder.separated(", ");
            for id in ids {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");
        }

        builder.push(" ORDER BY o.id");

        let rows = builder
            .build_query_as::<OrderWithEmailRow>()
            .fetch_all(&self.pool)
            .await?;

        debug!(requested = ids.len(), exported = rows.len(), "Export rows loaded");

        Ok(rows
            .into_iter()
            .map(|row| OrderExportRow {
                order_id: row.id,
                user_email: row.user_email.unwrap_or_default(),
                total: Money::from_cents(row.total_cents),
                status: OrderStatus::from(row.status),
                created_at: row.created_at,
                shipping_address: row.shipping_address,
            })
            .collect())
    }

    /// Counts all orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
