//! # Seed Data
//!
//! Bootstrap records for a fresh database: one admin account and a two-item
//! sample catalog. Safe to run repeatedly.

use tracing::info;

use crate::error::DbResult;
use crate::repository::user::{hash_password, NewUser};
use crate::Database;
use storefront_core::{NewProduct, Role};

/// Email of the bootstrap admin account.
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// Password given to the bootstrap admin when none is supplied.
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@12345";

/// What a seed run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub products_created: usize,
}

fn sample_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            name: "Sample T-Shirt".to_string(),
            slug: Some("sample-tshirt".to_string()),
            category: Some("Clothing".to_string()),
            price_cents: 29_900,
            stock: 50,
            description: Some("Comfort tee".to_string()),
            ..Default::default()
        },
        NewProduct {
            name: "Sample Mug".to_string(),
            slug: Some("sample-mug".to_string()),
            category: Some("Home".to_string()),
            price_cents: 14_900,
            stock: 100,
            description: Some("Ceramic mug".to_string()),
            ..Default::default()
        },
    ]
}

/// Creates the admin account if absent and the sample products if the
/// catalog is empty.
pub async fn seed_defaults(db: &Database, admin_password: &str) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    if db.users().get_by_email(ADMIN_EMAIL).await?.is_none() {
        db.users()
            .create(NewUser {
                email: ADMIN_EMAIL.to_string(),
                name: "Admin".to_string(),
                password_hash: hash_password(admin_password)?,
                role: Role::Admin,
            })
            .await?;
        report.admin_created = true;
    }

    if db.products().count_active().await? == 0 {
        for product in sample_products() {
            db.products().create(product).await?;
            report.products_created += 1;
        }
    }

    info!(
        admin_created = report.admin_created,
        products_created = report.products_created,
        "Seed complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let first = seed_defaults(&db, DEFAULT_ADMIN_PASSWORD).await.unwrap();
        assert_eq!(
            first,
            SeedReport {
                admin_created: true,
                products_created: 2
            }
        );

        let second = seed_defaults(&db, DEFAULT_ADMIN_PASSWORD).await.unwrap();
        assert_eq!(second, SeedReport::default());

        let creds = db.users().get_credentials(ADMIN_EMAIL).await.unwrap().unwrap();
        assert_eq!(creds.user.role, Role::Admin);
        assert!(creds.verify(DEFAULT_ADMIN_PASSWORD));
        assert_eq!(db.products().count_active().await.unwrap(), 2);
    }
}
