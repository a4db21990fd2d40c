//! Order placement and admin order management.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use storefront_core::validation::validate_search_query;
use storefront_core::{OrderLineInput, OrderRequest, OrderStatus, OrderSummary, PageRequest};
use storefront_db::OrderFilter;
use tracing::info;

use crate::error::ApiResult;
use crate::export::render_csv;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderLineInput>,
    #[serde(default)]
    pub shipping_address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderCreated {
    pub order_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub page: Option<i64>,
    pub per: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct OrderList {
    pub orders: Vec<OrderSummary>,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub status: OrderStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub csv: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/orders`
pub async fn create_order(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(body): ApiJson<CreateOrderRequest>,
) -> ApiResult<Json<OrderCreated>> {
    let request = OrderRequest::new(body.items, body.shipping_address)?;
    let order_id = state.db.orders().place_order(user.id, &request).await?;

    info!(order_id, user_id = user.id, "Order accepted");
    Ok(Json(OrderCreated { order_id }))
}

/// `GET /api/admin/orders`
pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<OrderQuery>,
) -> ApiResult<Json<OrderList>> {
    let q = query.q.as_deref().map(validate_search_query).transpose()?;
    let page = PageRequest::new(query.page, query.per);
    let filter = OrderFilter {
        q,
        status: query.status,
    };

    let result = state.db.orders().list_orders(&filter, page).await?;

    Ok(Json(OrderList {
        orders: result.items,
        total: result.total,
    }))
}

/// `PUT /api/admin/orders/{id}/status`
pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let status = state
        .db
        .orders()
        .update_status(id, body.status.as_deref())
        .await?;

    Ok(Json(StatusResponse { ok: true, status }))
}

/// `POST /api/admin/orders/export`
pub async fn export_orders(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ExportRequest>,
) -> ApiResult<Json<ExportResponse>> {
    let rows = state.db.orders().export_rows(&body.ids).await?;
    let csv = render_csv(&rows)?;

    info!(rows = rows.len(), "Orders exported");
    Ok(Json(ExportResponse { csv }))
}
