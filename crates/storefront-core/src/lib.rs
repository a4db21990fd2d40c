//! # storefront-core: Pure Business Logic for the Storefront
//!
//! Domain types and rules with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-api (axum, JWT)                      │   │
//! │  │   /api/register  /api/products  /api/orders  /api/admin/*      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ storefront-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   order   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ OrderReq  │  │ pagination│  │   │
//! │  │   │  Order    │  │           │  │ line math │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Database Layer)                  │   │
//! │  │        SQLite, migrations, repositories, order transaction      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Order, ...)
//! - [`money`] - Integer money
//! - [`order`] - Order request validation and line arithmetic
//! - [`pagination`] - Page/per normalization
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::order::{add_line, line_total};
//! use storefront_core::Money;
//!
//! // Product A at 1.00, three units, onto an empty order:
//! let line = line_total(Money::from_cents(100), 3).unwrap();
//! assert_eq!(add_line(Money::zero(), line).unwrap(), Money::from_cents(300));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod pagination;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{OrderLine, OrderLineInput, OrderRequest};
pub use pagination::{Page, PageRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Page size used when the client does not ask for one.
pub const DEFAULT_PER_PAGE: i64 = 50;

/// Largest page size a client may request.
pub const MAX_PER_PAGE: i64 = 200;

/// Longest accepted catalog search term, in characters.
pub const MAX_QUERY_LEN: usize = 100;
