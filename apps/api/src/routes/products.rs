//! Catalog endpoints: the public listing and admin product management.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use storefront_core::validation::validate_search_query;
use storefront_core::{NewProduct, PageRequest, Product, ProductUpdate};
use storefront_db::ProductFilter;

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::Ack;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per: Option<i64>,
}

/// A product as shown in the public catalog.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub weight: f64,
    pub price_cents: i64,
    pub stock: i64,
    pub images: Vec<String>,
    pub description: Option<String>,
}

impl From<Product> for ProductView {
    fn from(p: Product) -> Self {
        ProductView {
            id: p.id,
            name: p.name,
            slug: p.slug,
            category: p.category,
            weight: p.weight,
            price_cents: p.price_cents,
            stock: p.stock,
            images: p.images,
            description: p.description,
        }
    }
}

/// A row of the admin product table.
#[derive(Debug, Serialize)]
pub struct AdminProductView {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
    pub deleted: bool,
}

impl From<Product> for AdminProductView {
    fn from(p: Product) -> Self {
        AdminProductView {
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
            stock: p.stock,
            deleted: p.deleted,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductList<T> {
    pub products: Vec<T>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct ProductCreated {
    pub product_id: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/products`
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> ApiResult<Json<ProductList<ProductView>>> {
    let q = query.q.as_deref().map(validate_search_query).transpose()?;
    let page = PageRequest::new(query.page, query.per);

    let result = state
        .db
        .products()
        .list_public(&ProductFilter { q }, page)
        .await?;

    Ok(Json(ProductList {
        total: result.total,
        products: result.items.into_iter().map(ProductView::from).collect(),
    }))
}

/// `GET /api/admin/products`
pub async fn admin_list_products(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<ProductList<AdminProductView>>> {
    let page = PageRequest::new(query.page, query.per);
    let result = state.db.products().list_all(page).await?;

    Ok(Json(ProductList {
        total: result.total,
        products: result.items.into_iter().map(AdminProductView::from).collect(),
    }))
}

/// `POST /api/admin/products`
pub async fn create_product(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewProduct>,
) -> ApiResult<(StatusCode, Json<ProductCreated>)> {
    let product_id = state.db.products().create(body).await?;
    Ok((StatusCode::CREATED, Json(ProductCreated { product_id })))
}

/// `PUT /api/admin/products/{id}`
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(body): ApiJson<ProductUpdate>,
) -> ApiResult<Json<Ack>> {
    state.db.products().update(id, body).await?;
    Ok(Json(Ack::ok()))
}

/// `DELETE /api/admin/products/{id}`
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Ack>> {
    state.db.products().soft_delete(id).await?;
    Ok(Json(Ack::ok()))
}
