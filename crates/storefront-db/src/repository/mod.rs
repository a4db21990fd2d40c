//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  state.db.orders().place_order(user.id, &request)              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                        │
//! │  ├── place_order(&self, user_id, request)   (one transaction)          │
//! │  ├── list_orders(&self, filter, page)                                  │
//! │  └── update_status / export_rows / get_order / get_items               │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Accounts and password hashing
//! - [`product::ProductRepository`] - Catalog CRUD and listing
//! - [`order::OrderRepository`] - Order placement and administration

pub mod order;
pub mod product;
pub mod user;
