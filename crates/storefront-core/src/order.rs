//! # Order Module
//!
//! The pure half of order placement: building a validated request and the
//! per-line arithmetic. The transactional half lives in storefront-db.
//!
//! ## Order Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  JSON items[{product_id, qty?}]                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderRequest::new()  ← THIS MODULE                                    │
//! │       ├── items empty?       → CoreError::EmptyOrder                   │
//! │       ├── qty missing?       → defaults to 1                           │
//! │       └── qty <= 0?          → ValidationError                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  storefront-db place_order (one transaction)                           │
//! │       ├── line_total(price snapshot, qty)   ← THIS MODULE              │
//! │       ├── add_line(total, line)             ← THIS MODULE              │
//! │       └── stock = MAX(stock - qty, 0)       (SQL)                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{validate_quantity, ValidationResult};

// =============================================================================
// Input
// =============================================================================

/// A cart line as submitted by the client.
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct OrderLineInput {
    pub product_id: i64,
    /// Defaults to 1 when omitted.
    #[serde(default)]
    pub qty: Option<i64>,
}

// =============================================================================
// Validated Request
// =============================================================================

/// A validated order line. `qty` is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: i64,
    pub qty: i64,
}

/// An order ready for the order engine. Always holds at least one line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    lines: Vec<OrderLine>,
    shipping_address: Option<String>,
}

impl OrderRequest {
    /// Validates raw cart lines.
    ///
    /// ```rust
    /// use storefront_core::order::{OrderLineInput, OrderRequest};
    ///
    /// let req = OrderRequest::new(
    ///     vec![OrderLineInput { product_id: 7, qty: None }],
    ///     Some("1 Main St".to_string()),
    /// )
    /// .unwrap();
    /// assert_eq!(req.lines()[0].qty, 1);
    ///
    /// assert!(OrderRequest::new(vec![], None).is_err());
    /// ```
    pub fn new(items: Vec<OrderLineInput>, shipping_address: Option<String>) -> CoreResult<Self> {
        if items.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        let lines = items
            .into_iter()
            .map(|item| -> CoreResult<OrderLine> {
                let qty = item.qty.unwrap_or(1);
                validate_quantity(qty)?;
                Ok(OrderLine {
                    product_id: item.product_id,
                    qty,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let shipping_address = shipping_address
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            lines,
            shipping_address,
        })
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn shipping_address(&self) -> Option<&str> {
        self.shipping_address.as_deref()
    }
}

// =============================================================================
// Line Arithmetic
// =============================================================================

/// Line total for a snapshot price.
///
/// Quantities have no upper bound, so an absurd one can overflow; that is
/// reported as a validation failure on `quantity`.
///
/// ```rust
/// use storefront_core::order::line_total;
/// use storefront_core::Money;
///
/// assert_eq!(line_total(Money::from_cents(100), 3).unwrap(), Money::from_cents(300));
/// assert!(line_total(Money::from_cents(100), i64::MAX).is_err());
/// ```
#[inline]
pub fn line_total(unit_price: Money, qty: i64) -> ValidationResult<Money> {
    unit_price
        .checked_mul_qty(qty)
        .ok_or_else(|| ValidationError::too_large("quantity"))
}

/// Adds a line total to a running order total.
#[inline]
pub fn add_line(total: Money, line: Money) -> ValidationResult<Money> {
    total
        .cents()
        .checked_add(line.cents())
        .map(Money::from_cents)
        .ok_or_else(|| ValidationError::too_large("total"))
}

// =============================================================================
// Unit Tests
// =============================================================================
