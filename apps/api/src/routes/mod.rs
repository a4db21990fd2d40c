//! HTTP routes.
//!
//! ```text
//! /health                                   public
//! /api
//!  ├── POST /register, /login, /admin/login public
//!  ├── GET  /products                       public
//!  ├── POST /orders                         require_auth
//!  └── /admin/products, /admin/orders/...   require_auth → require_admin
//! ```

pub mod auth;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::{require_admin, require_auth};
use crate::state::AppState;

/// `{"ok": true}`
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Ack { ok: true }
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/admin/login", post(auth::admin_login))
        .route("/products", get(products::list_products));

    let customer = Router::new()
        .route("/orders", post(orders::create_order))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    // The last route_layer runs first: auth, then the role check.
    let admin = Router::new()
        .route(
            "/admin/products",
            get(products::admin_list_products).post(products::create_product),
        )
        .route(
            "/admin/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/admin/orders", get(orders::list_orders))
        .route("/admin/orders/{id}/status", put(orders::update_status))
        .route("/admin/orders/export", post(orders::export_orders))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", public.merge(customer).merge(admin))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
