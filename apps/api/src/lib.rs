//! # Storefront API
//!
//! HTTP/JSON server for the storefront: accounts, catalog and orders.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront API                                   │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  routes::auth  │  │ routes::products│ │  routes::orders            ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • list (public)│  │ • create (customer)        ││
//! │  │ • login        │  │ • create       │  │ • list / status (admin)    ││
//! │  │ • admin_login  │  │ • update/delete│  │ • export CSV (admin)       ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │ storefront-db│  │ TokenService │  │ middleware               ││  │
//! │  │  │              │  │              │  │                          ││  │
//! │  │  │ SQLite pool  │  │ HS256 JWT    │  │ require_auth             ││  │
//! │  │  │ repositories │  │ issue/verify │  │ require_admin            ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (a `.env` file is honored):
//! - `SECRET_KEY` - Secret for JWT signing
//! - `DATABASE_URL` - SQLite URL (default: sqlite://storefront.db)
//! - `JWT_EXP_SECONDS` - Token lifetime (default: 86400)
//! - `HTTP_PORT` / `BIND_ADDR` - Listen address (default: 0.0.0.0:5000)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)

pub mod auth;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-exports
pub use auth::{Claims, TokenError, TokenService};
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;
