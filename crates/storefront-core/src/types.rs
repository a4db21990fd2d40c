//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │     Product     │   │      Order      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  email (unique) │   │  slug (unique)  │   │  user_id (FK)   │       │
//! │  │  role           │   │  price_cents    │   │  total_cents    │       │
//! │  │                 │   │  stock, deleted │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ 1..N           │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │      Role       │   │   OrderStatus   │   │    OrderItem    │       │
//! │  │  User | Admin   │   │  Pending        │   │  quantity       │       │
//! │  └─────────────────┘   │  Shipped        │   │  unit_price     │       │
//! │                        │  Other(String)  │   │  (snapshot)     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are SQLite integer row ids. Password hashes never appear in
//! these types; they stay inside the database layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer. Can browse and place orders.
    #[default]
    User,
    /// Store administrator. Can manage the catalog and orders.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parses a stored or claimed role. Unknown values fall back to `User`,
    /// so nothing but an exact `"admin"` grants admin rights.
    pub fn parse(value: &str) -> Self {
        match value {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name.
    pub name: String,

    /// URL-friendly identifier, unique when present.
    pub slug: Option<String>,

    pub category: Option<String>,

    /// Shipping weight, informational only.
    pub weight: f64,

    /// Price in cents.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Image URLs.
    pub images: Vec<String>,

    pub description: Option<String>,

    /// Soft-delete flag. Deleted products are hidden from the public
    /// catalog but stay referenced by historical order items.
    pub deleted: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the product may be put on a new order.
    #[inline]
    pub fn is_orderable(&self) -> bool {
        !self.deleted
    }
}

/// Splits the comma-delimited image column into URLs.
///
/// ```rust
/// use storefront_core::types::split_images;
///
/// assert_eq!(split_images("a.png, b.png,"), vec!["a.png", "b.png"]);
/// assert!(split_images("").is_empty());
/// ```
pub fn split_images(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins image URLs into the stored comma-delimited form.
pub fn join_images(images: &[String]) -> String {
    images
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

// =============================================================================
// Product Inputs
// =============================================================================

/// Fields for creating a product.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial product update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub weight: Option<f64>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
    pub images: Option<Vec<String>>,
    pub description: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.category.is_none()
            && self.weight.is_none()
            && self.price_cents.is_none()
            && self.stock.is_none()
            && self.images.is_none()
            && self.description.is_none()
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment state of an order.
///
/// Admins may set arbitrary labels, so anything other than the two
/// well-known states is carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Shipped,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Other(s) => s,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => OrderStatus::Pending,
            "Shipped" => OrderStatus::Shipped,
            _ => OrderStatus::Other(value),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        OrderStatus::from(value.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    /// Sum of `unit_price_cents × quantity` over the order's items.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line of an order. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Product price captured when the order was placed.
    pub unit_price_cents: i64,
}

impl OrderItem {
    /// `unit_price_cents × quantity`, `None` on overflow.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        Money::from_cents(self.unit_price_cents).checked_mul_qty(self.quantity)
    }
}

/// One row of the admin order listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderSummary {
    pub id: i64,
    pub user_email: String,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// One row of the order CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderExportRow {
    pub order_id: i64,
    pub user_email: String,
    pub total: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub shipping_address: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_default() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("Admin"), Role::User);
        assert_eq!(Role::parse(""), Role::User);
        assert!(Role::Admin.is_admin());
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn test_order_status_round_trips_free_form() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(OrderStatus::from("Shipped"), OrderStatus::Shipped);
        let custom = OrderStatus::from("Awaiting pickup");
        assert_eq!(custom, OrderStatus::Other("Awaiting pickup".to_string()));
        assert_eq!(String::from(custom), "Awaiting pickup");

        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"Pending\"");
    }

    #[test]
    fn test_images_split_and_join() {
        let images = split_images("https://a/1.png,https://a/2.png");
        assert_eq!(images.len(), 2);
        assert_eq!(join_images(&images), "https://a/1.png,https://a/2.png");
        assert_eq!(join_images(&[]), "");
    }

    #[test]
    fn test_product_update_is_empty() {
        assert!(ProductUpdate::default().is_empty());
        let update = ProductUpdate {
            stock: Some(3),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_item_line_total() {
        let item = OrderItem {
            id: 1,
            order_id: 1,
            product_id: 1,
            quantity: 3,
            unit_price_cents: 100,
        };
        assert_eq!(item.line_total(), Some(Money::from_cents(300)));

        let huge = OrderItem {
            quantity: i64::MAX,
            ..item
        };
        assert_eq!(huge.line_total(), None);
    }
}
