//! # Product Repository
//!
//! The catalog store: product CRUD with soft delete and paginated listing.
//!
//! ## Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Catalog Filtering Works                          │
//! │                                                                         │
//! │  GET /api/products?q=mug&page=1&per=50                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "mug" → LIKE '%mug%' ESCAPE '\'  over name, slug, category            │
//! │       │   ('%' and '_' typed by the user are matched literally)         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ products (deleted = 0)                  │                           │
//! │  │                                         │                           │
//! │  │ Sample Mug    | sample-mug    | Home    │ ← MATCH                   │
//! │  │ Sample T-Shirt| sample-tshirt | Clothing│                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ORDER BY created_at DESC, id DESC  LIMIT per OFFSET (page-1)*per      │
//! │  + COUNT(*) of the same filter → Page { items, total }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use storefront_core::types::{join_images, split_images};
use storefront_core::validation::{validate_new_product, validate_product_update};
use storefront_core::{NewProduct, Page, PageRequest, Product, ProductUpdate};

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: i64,
    name: String,
    slug: Option<String>,
    category: Option<String>,
    weight: f64,
    price_cents: i64,
    stock: i64,
    images: String,
    description: Option<String>,
    deleted: bool,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            slug: row.slug,
            category: row.category,
            weight: row.weight,
            price_cents: row.price_cents,
            stock: row.stock,
            images: split_images(&row.images),
            description: row.description,
            deleted: row.deleted,
            created_at: row.created_at,
        }
    }
}

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, name, slug, category, weight, price_cents, stock, images, description, deleted, created_at";

/// Public catalog filter.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring over name, slug and category.
    pub q: Option<String>,
}

/// Escapes LIKE wildcards and wraps the term for a substring match.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn unique_slug(err: DbError, slug: Option<&str>) -> DbError {
    match err {
        DbError::UniqueViolation { .. } => DbError::duplicate("slug", slug.unwrap_or_default()),
        other => other,
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let page = repo.list_public(&ProductFilter { q: Some("mug".into()) }, PageRequest::default()).await?;
/// let product = repo.get_product(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by id, including soft-deleted ones.
    pub async fn get_product(&self, id: i64) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Lists non-deleted products, newest first.
    ///
    /// Read-only: no query parameter can cause a write.
    pub async fn list_public(
        &self,
        filter: &ProductFilter,
        page: PageRequest,
    ) -> DbResult<Page<Product>> {
        let pattern = filter
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(like_pattern);

        debug!(
            q = ?filter.q,
            page = page.page(),
            per = page.per(),
            "Listing public products"
        );

        // ?1 IS NULL disables the filter; COALESCE keeps NULL columns from
        // poisoning the OR.
        const WHERE: &str = "WHERE deleted = 0 AND (?1 IS NULL \
             OR name LIKE ?1 ESCAPE '\\' \
             OR COALESCE(slug, '') LIKE ?1 ESCAPE '\\' \
             OR COALESCE(category, '') LIKE ?1 ESCAPE '\\')";

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products {WHERE} \
             ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
        ))
        .bind(pattern.as_deref())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products {WHERE}"))
            .bind(pattern.as_deref())
            .fetch_one(&self.pool)
            .await?;

        debug!(count = rows.len(), total, "Public listing returned products");

        Ok(Page {
            items: rows.into_iter().map(Product::from).collect(),
            total,
        })
    }

    /// Lists every product, deleted ones included, newest first.
    pub async fn list_all(&self, page: PageRequest) -> DbResult<Page<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(Page {
            items: rows.into_iter().map(Product::from).collect(),
            total,
        })
    }

    /// Creates a product and returns its id.
    ///
    /// ## Errors
    /// * `DbError::Validation` - empty name, negative price or stock
    /// * `DbError::UniqueViolation` - slug already taken
    pub async fn create(&self, product: NewProduct) -> DbResult<i64> {
        validate_new_product(&product)?;

        debug!(name = %product.name, slug = ?product.slug, "Creating product");

        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO products \
             (name, slug, category, weight, price_cents, stock, images, description, deleted, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9) \
             RETURNING id",
        )
        .bind(product.name.trim())
        .bind(product.slug.as_deref())
        .bind(product.category.as_deref())
        .bind(product.weight)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(join_images(&product.images))
        .bind(product.description.as_deref())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_slug(e.into(), product.slug.as_deref()))?;

        info!(product_id = id, name = %product.name, "Product created");
        Ok(id)
    }

    /// Applies a partial update in one statement. Absent fields keep their
    /// stored value, so a concurrent stock decrement is never overwritten
    /// by an edit that didn't touch stock.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - no product with this id
    pub async fn update(&self, id: i64, update: ProductUpdate) -> DbResult<()> {
        validate_product_update(&update)?;

        debug!(product_id = id, "Updating product");

        let images = update.images.as_deref().map(join_images);

        let result = sqlx::query(
            "UPDATE products SET \
                name = COALESCE(?2, name), \
                slug = COALESCE(?3, slug), \
                category = COALESCE(?4, category), \
                weight = COALESCE(?5, weight), \
                price_cents = COALESCE(?6, price_cents), \
                stock = COALESCE(?7, stock), \
                images = COALESCE(?8, images), \
                description = COALESCE(?9, description) \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.slug.as_deref())
        .bind(update.category.as_deref())
        .bind(update.weight)
        .bind(update.price_cents)
        .bind(update.stock)
        .bind(images)
        .bind(update.description.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| unique_slug(e.into(), update.slug.as_deref()))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(product_id = id, "Product updated");
        Ok(())
    }

    /// Soft-deletes a product.
    ///
    /// ## Why Soft Delete?
    /// Historical order items still reference the product row.
    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        debug!(product_id = id, "Soft-deleting product");

        let result = sqlx::query("UPDATE products SET deleted = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    /// Counts non-deleted products (for diagnostics and seeding).
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted = 0")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn product(name: &str, slug: &str, category: &str, price_cents: i64, stock: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            slug: Some(slug.to_string()),
            category: Some(category.to_string()),
            price_cents,
            stock,
            ..Default::default()
        }
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("mug"), "%mug%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = setup().await;
        let repo = db.products();

        let mut input = product("Sample Mug", "sample-mug", "Home", 149, 100);
        input.images = vec!["https://cdn/mug.png".to_string()];
        let id = repo.create(input).await.unwrap();

        let stored = repo.get_product(id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Sample Mug");
        assert_eq!(stored.price_cents, 149);
        assert_eq!(stored.images, vec!["https://cdn/mug.png"]);
        assert!(!stored.deleted);

        assert!(repo.get_product(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_and_duplicate_slug() {
        let db = setup().await;
        let repo = db.products();

        let err = repo.create(product("", "x", "Home", 1, 1)).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        let err = repo.create(product("Mug", "mug", "Home", 1, -1)).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));

        repo.create(product("Mug", "mug", "Home", 1, 1)).await.unwrap();
        let err = repo.create(product("Mug 2", "mug", "Home", 1, 1)).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_list_public_filters_and_excludes_deleted() {
        let db = setup().await;
        let repo = db.products();

        let shirt = repo
            .create(product("Sample T-Shirt", "sample-tshirt", "Clothing", 299, 50))
            .await
            .unwrap();
        let mug = repo
            .create(product("Sample Mug", "sample-mug", "Home", 149, 100))
            .await
            .unwrap();
        let hidden = repo
            .create(product("Old Mug", "old-mug", "Home", 99, 1))
            .await
            .unwrap();
        repo.soft_delete(hidden).await.unwrap();

        let all = repo
            .list_public(&ProductFilter::default(), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total, 2);
        // Newest first.
        assert_eq!(all.items[0].id, mug);
        assert_eq!(all.items[1].id, shirt);

        let filter = ProductFilter { q: Some("MUG".to_string()) };
        let found = repo.list_public(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].id, mug);

        let filter = ProductFilter { q: Some("cloth".to_string()) };
        let found = repo.list_public(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(found.items[0].id, shirt);

        // A literal '%' must not act as a wildcard.
        let filter = ProductFilter { q: Some("%".to_string()) };
        let found = repo.list_public(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(found.total, 0);
    }

    #[tokio::test]
    async fn test_list_public_paginates() {
        let db = setup().await;
        let repo = db.products();
        for i in 0..5 {
            repo.create(product(&format!("P{i}"), &format!("p-{i}"), "Misc", 10, 1))
                .await
                .unwrap();
        }

        let page = repo
            .list_public(&ProductFilter::default(), PageRequest::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "P2");

        let past_end = repo
            .list_public(&ProductFilter::default(), PageRequest::new(Some(9), Some(2)))
            .await
            .unwrap();
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.total, 5);
    }

    #[tokio::test]
    async fn test_list_all_includes_deleted() {
        let db = setup().await;
        let repo = db.products();
        let id = repo.create(product("Mug", "mug", "Home", 1, 1)).await.unwrap();
        repo.soft_delete(id).await.unwrap();

        let page = repo.list_all(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items[0].deleted);
        assert_eq!(repo.count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let db = setup().await;
        let repo = db.products();
        let id = repo.create(product("Mug", "mug", "Home", 149, 10)).await.unwrap();

        let update = ProductUpdate {
            price_cents: Some(199),
            images: Some(vec!["a.png".to_string(), "b.png".to_string()]),
            ..Default::default()
        };
        repo.update(id, update).await.unwrap();

        let stored = repo.get_product(id).await.unwrap().unwrap();
        assert_eq!(stored.price_cents, 199);
        assert_eq!(stored.stock, 10);
        assert_eq!(stored.name, "Mug");
        assert_eq!(stored.images.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let db = setup().await;
        let repo = db.products();

        let err = repo.update(42, ProductUpdate::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        let err = repo.soft_delete(42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
