//! # Validation Module
//!
//! Input validation for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (storefront-api)                             │
//! │  ├── JSON / query-string deserialization                               │
//! │  └── Missing fields → 400                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Email / password presence                                         │
//! │  ├── Product name, slug, price, stock                                  │
//! │  └── Order quantities                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE (users.email, products.slug)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::{NewProduct, ProductUpdate};
use crate::MAX_QUERY_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Account Validators
// =============================================================================

/// Validates and normalizes an email address.
///
/// Only the shape is checked: something before and after a single `@`.
/// The returned value is trimmed and lowercased so that uniqueness in the
/// users table is case-insensitive.
///
/// ```rust
/// use storefront_core::validation::validate_email;
///
/// assert_eq!(validate_email("  Ann@Example.com ").unwrap(), "ann@example.com");
/// assert!(validate_email("").is_err());
/// assert!(validate_email("no-at-sign").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > 120 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 120,
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email.to_lowercase())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

/// Validates a password. Any non-empty value is accepted.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a slug: lowercase letters, digits and hyphens.
pub fn validate_slug(slug: &str) -> ValidationResult<()> {
    if slug.is_empty() {
        return Err(ValidationError::required("slug"));
    }

    if slug.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "slug".to_string(),
            max: 200,
        });
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "slug".to_string(),
            reason: "must contain only lowercase letters, digits, and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

fn validate_weight(weight: f64) -> ValidationResult<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ValidationError::InvalidFormat {
            field: "weight".to_string(),
            reason: "must be a non-negative number".to_string(),
        });
    }

    Ok(())
}

/// Validates every field of a product about to be created.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    if let Some(slug) = &product.slug {
        validate_slug(slug)?;
    }
    validate_weight(product.weight)?;
    validate_price_cents(product.price_cents)?;
    validate_stock(product.stock)?;
    Ok(())
}

/// Validates only the fields present in a partial update.
pub fn validate_product_update(update: &ProductUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.name {
        validate_product_name(name)?;
    }
    if let Some(slug) = &update.slug {
        validate_slug(slug)?;
    }
    if let Some(weight) = update.weight {
        validate_weight(weight)?;
    }
    if let Some(price) = update.price_cents {
        validate_price_cents(price)?;
    }
    if let Some(stock) = update.stock {
        validate_stock(stock)?;
    }
    Ok(())
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates an order line quantity.
///
/// ## User Workflow
/// ```text
/// POST /api/orders { "items": [{ "product_id": 1, "qty": 0 }] }
///       │
///       ▼
/// validate_quantity(0) ← THIS FUNCTION
///       │
///       ├── qty <= 0? → 400 "quantity must be positive"
///       │
///       └── OK → line accepted
/// ```
///
/// There is no upper bound: quantities above stock are clamped later, not
/// rejected.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog search term and returns it trimmed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "q".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("@b.co").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email(&format!("{}@x.io", "a".repeat(200))).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("x").is_ok());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("sample-tshirt").is_ok());
        assert!(validate_slug("mug-2").is_ok());
        assert!(validate_slug("Has Caps").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let mut product = NewProduct {
            name: "Sample Mug".to_string(),
            price_cents: 149,
            stock: 100,
            ..Default::default()
        };
        assert!(validate_new_product(&product).is_ok());

        product.stock = -1;
        assert!(validate_new_product(&product).is_err());

        product.stock = 1;
        product.price_cents = -5;
        assert!(validate_new_product(&product).is_err());

        product.price_cents = 0;
        product.name = "   ".to_string();
        assert!(matches!(
            validate_new_product(&product),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_product_update_checks_present_fields_only() {
        assert!(validate_product_update(&ProductUpdate::default()).is_ok());
        let update = ProductUpdate {
            price_cents: Some(-1),
            ..Default::default()
        };
        assert!(validate_product_update(&update).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  mug ").unwrap(), "mug");
        assert!(validate_search_query(&"q".repeat(MAX_QUERY_LEN + 1)).is_err());
    }
}
