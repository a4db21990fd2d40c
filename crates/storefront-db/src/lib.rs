//! # storefront-db: Database Layer for the Storefront
//!
//! SQLite persistence through sqlx: pool, migrations, repositories, and the
//! order placement transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   storefront-api ──► Database ──┬──► users()    UserRepository          │
//! │                                 ├──► products() ProductRepository       │
//! │                                 └──► orders()   OrderRepository         │
//! │                                           │                             │
//! │                                           ▼                             │
//! │                                 SqlitePool (WAL, foreign keys)          │
//! │                                                                         │
//! │   storefront-core supplies the types and rules; nothing here formats   │
//! │   HTTP responses.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (user, product, order)
//! - [`seed`] - Bootstrap admin account and sample catalog
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("sqlite://storefront.db")).await?;
//! let order_id = db.orders().place_order(user_id, &request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::order::{OrderFilter, OrderRepository};
pub use repository::product::{ProductFilter, ProductRepository};
pub use repository::user::{
    hash_password, verify_password, NewUser, UserCredentials, UserRepository,
};
