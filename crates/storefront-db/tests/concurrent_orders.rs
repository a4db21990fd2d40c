//! Concurrent order placement against a file-backed database.
//!
//! In-memory databases are pinned to one connection, so they can't show
//! writer contention. These tests use a scratch file in the temp dir with a
//! real multi-connection pool.

use std::path::PathBuf;

use storefront_core::{NewProduct, OrderLineInput, OrderRequest, Role};
use storefront_db::{hash_password, Database, DbConfig, NewUser};
use uuid::Uuid;

struct ScratchDb {
    path: PathBuf,
}

impl ScratchDb {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!("storefront-test-{}.db", Uuid::new_v4()));
        ScratchDb { path }
    }

    fn url(&self) -> String {
        format!("sqlite://{}", self.path.display())
    }
}

impl Drop for ScratchDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}

async fn seed(db: &Database, stock: i64) -> (i64, i64) {
    let user = db
        .users()
        .create(NewUser {
            email: "buyer@example.com".to_string(),
            name: String::new(),
            password_hash: hash_password("Secret1").unwrap(),
            role: Role::User,
        })
        .await
        .unwrap();

    let product = db
        .products()
        .create(NewProduct {
            name: "Product A".to_string(),
            price_cents: 100,
            stock,
            ..Default::default()
        })
        .await
        .unwrap();

    (user.id, product)
}

fn single_unit(product_id: i64) -> OrderRequest {
    OrderRequest::new(
        vec![OrderLineInput {
            product_id,
            qty: Some(1),
        }],
        None,
    )
    .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_orders_serialize_stock_decrements() {
    let scratch = ScratchDb::new();
    let db = Database::new(DbConfig::new(scratch.url()).max_connections(5))
        .await
        .unwrap();

    const INITIAL: i64 = 20;
    const ORDERS: i64 = 12;
    let (user_id, product_id) = seed(&db, INITIAL).await;

    let handles: Vec<_> = (0..ORDERS)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move { db.orders().place_order(user_id, &single_unit(product_id)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let product = db.products().get_product(product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, INITIAL - ORDERS);
    assert_eq!(db.orders().count().await.unwrap(), ORDERS);

    db.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_oversell_floors_at_zero() {
    let scratch = ScratchDb::new();
    let db = Database::new(DbConfig::new(scratch.url()).max_connections(5))
        .await
        .unwrap();

    let (user_id, product_id) = seed(&db, 3).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move { db.orders().place_order(user_id, &single_unit(product_id)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let product = db.products().get_product(product_id).await.unwrap().unwrap();
    assert_eq!(product.stock, 0);

    db.close().await;
}
