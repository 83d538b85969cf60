//! PostgreSQL integration tests for the catalog.
//!
//! These tests need Docker and are ignored by default. Run with:
//!
//! ```bash
//! cargo test -p catalog --test postgres_integration -- --ignored --test-threads=1
//! ```

use std::sync::Arc;

use catalog::{Catalog, CatalogError, PostgresCatalog, Product, StockRequest};
use common::{Money, ProductId};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_products_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

async fn get_test_catalog() -> PostgresCatalog {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE products CASCADE")
        .execute(&pool)
        .await
        .unwrap();

    PostgresCatalog::new(pool)
}

fn product(id: i64, stock: u32) -> Product {
    Product::new(ProductId::new(id), format!("Product {id}"), Money::from_cents(2000), stock)
}

#[tokio::test]
#[ignore = "requires docker"]
async fn upsert_and_get_product() {
    let catalog = get_test_catalog().await;
    catalog.upsert(&product(1, 10)).await.unwrap();

    let loaded = catalog.get_product(ProductId::new(1)).await.unwrap();
    assert_eq!(loaded, Some(product(1, 10)));

    let missing = catalog.get_product(ProductId::new(2)).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
#[ignore = "requires docker"]
async fn conditional_decrement() {
    let catalog = get_test_catalog().await;
    catalog.upsert(&product(1, 10)).await.unwrap();

    assert_eq!(catalog.decrement_stock(ProductId::new(1), 6).await.unwrap(), 4);

    let refused = catalog.decrement_stock(ProductId::new(1), 6).await;
    assert!(matches!(
        refused,
        Err(CatalogError::InsufficientStock {
            available: 4,
            requested: 6,
            ..
        })
    ));

    let missing = catalog.decrement_stock(ProductId::new(9), 1).await;
    assert!(matches!(missing, Err(CatalogError::ProductNotFound(_))));
}

#[tokio::test]
#[ignore = "requires docker"]
async fn decrement_all_is_all_or_nothing() {
    let catalog = get_test_catalog().await;
    catalog.upsert(&product(1, 10)).await.unwrap();
    catalog.upsert(&product(2, 1)).await.unwrap();

    let result = catalog
        .decrement_all(&[
            StockRequest::new(ProductId::new(1), 5),
            StockRequest::new(ProductId::new(2), 2),
        ])
        .await;
    assert!(result.is_err());

    let stock = catalog.get_product(ProductId::new(1)).await.unwrap().unwrap();
    assert_eq!(stock.stock_on_hand, 10);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn concurrent_decrements_never_oversell() {
    let catalog = get_test_catalog().await;
    catalog.upsert(&product(1, 10)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..5 {
        let catalog = catalog.clone();
        handles.push(tokio::spawn(async move {
            catalog.decrement_stock(ProductId::new(1), 3).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 3);
    let stock = catalog.get_product(ProductId::new(1)).await.unwrap().unwrap();
    assert_eq!(stock.stock_on_hand, 1);
}

#[tokio::test]
#[ignore = "requires docker"]
async fn opposing_batches_do_not_deadlock() {
    let catalog = get_test_catalog().await;
    catalog.upsert(&product(1, 100)).await.unwrap();
    catalog.upsert(&product(2, 100)).await.unwrap();

    let mut handles = Vec::new();
    for n in 0..20 {
        let catalog = catalog.clone();
        let batch = if n % 2 == 0 {
            [StockRequest::new(ProductId::new(1), 2), StockRequest::new(ProductId::new(2), 3)]
        } else {
            [StockRequest::new(ProductId::new(2), 3), StockRequest::new(ProductId::new(1), 2)]
        };
        handles.push(tokio::spawn(async move { catalog.decrement_all(&batch).await }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let first = catalog.get_product(ProductId::new(1)).await.unwrap().unwrap();
    let second = catalog.get_product(ProductId::new(2)).await.unwrap().unwrap();
    assert_eq!(first.stock_on_hand, 60);
    assert_eq!(second.stock_on_hand, 40);
}
