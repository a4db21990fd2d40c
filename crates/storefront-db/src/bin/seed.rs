//! # Seed
//!
//! Prepares a database for first use.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by DATABASE_URL (or sqlite://storefront.db)
//! cargo run -p storefront-db --bin seed
//!
//! # Choose the database and the admin password
//! cargo run -p storefront-db --bin seed -- --db sqlite://dev.db --admin-password 'S3cret!'
//! ```
//!
//! ## What It Creates
//! - `admin@example.com` with role `admin`, if no such account exists
//! - "Sample T-Shirt" and "Sample Mug", if the catalog is empty

use anyhow::Context;
use std::env;
use storefront_db::seed::{seed_defaults, ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
use storefront_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATABASE_URL: &str = "sqlite://storefront.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let mut admin_password = DEFAULT_ADMIN_PASSWORD.to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    database_url = args[i + 1].clone();
                    i += 1;
                }
            }
            "--admin-password" | "-p" => {
                if i + 1 < args.len() {
                    admin_password = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Storefront seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <URL>               Database URL (default: $DATABASE_URL or {DEFAULT_DATABASE_URL})");
                println!("  -p, --admin-password <PW>    Password for {ADMIN_EMAIL} (default: {DEFAULT_ADMIN_PASSWORD})");
                println!("  -h, --help                   Show this help message");
                return Ok(());
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&database_url))
        .await
        .with_context(|| format!("opening {database_url}"))?;

    let report = seed_defaults(&db, &admin_password)
        .await
        .context("seeding database")?;

    if report.admin_created {
        println!("✓ Created {ADMIN_EMAIL}");
    } else {
        println!("• {ADMIN_EMAIL} already exists");
    }
    if report.products_created > 0 {
        println!("✓ Created {} sample products", report.products_created);
    } else {
        println!("• Catalog not empty, sample products skipped");
    }

    db.close().await;
    Ok(())
}
