use async_trait::async_trait;
use common::{Money, ProductId};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::catalog::{Catalog, StockRequest, insufficient, lock_order};
use crate::{CatalogError, Product, Result};

/// PostgreSQL-backed catalog implementation.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new PostgreSQL catalog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts or replaces a product.
    pub async fn upsert(&self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price_cents, stock_on_hand)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name, price_cents = EXCLUDED.price_cents, stock_on_hand = EXCLUDED.stock_on_hand
            "#,
        )
        .bind(product.id.as_i64())
        .bind(&product.name)
        .bind(product.price.cents())
        .bind(i64::from(product.stock_on_hand))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        let product_id = ProductId::new(row.try_get("id")?);
        let stock: i64 = row.try_get("stock_on_hand")?;
        let stock_on_hand = u32::try_from(stock).map_err(|_| CatalogError::Corrupt {
            product_id,
            reason: format!("stock_on_hand {stock} out of range"),
        })?;

        Ok(Product {
            id: product_id,
            name: row.try_get("name")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            stock_on_hand,
        })
    }

    /// Runs the conditional decrement on the given connection.
    ///
    /// The `WHERE stock_on_hand >= $2` guard makes the check and the write a
    /// single statement, so concurrent callers cannot both pass the check.
    async fn decrement_in(
        tx: &mut Transaction<'_, Postgres>,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<u32> {
        let remaining: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock_on_hand = stock_on_hand - $2
            WHERE id = $1 AND stock_on_hand >= $2
            RETURNING stock_on_hand
            "#,
        )
        .bind(product_id.as_i64())
        .bind(i64::from(quantity))
        .fetch_optional(&mut **tx)
        .await?;

        match remaining {
            Some(stock) => u32::try_from(stock).map_err(|_| CatalogError::Corrupt {
                product_id,
                reason: format!("stock_on_hand {stock} out of range"),
            }),
            None => {
                let row = sqlx::query(
                    "SELECT id, name, price_cents, stock_on_hand FROM products WHERE id = $1",
                )
                .bind(product_id.as_i64())
                .fetch_optional(&mut **tx)
                .await?;

                match row {
                    Some(row) => Err(insufficient(&Self::row_to_product(row)?, quantity)),
                    None => Err(CatalogError::ProductNotFound(product_id)),
                }
            }
        }
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    async fn get_product(&self, product_id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT id, name, price_cents, stock_on_hand FROM products WHERE id = $1")
            .bind(product_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows =
            sqlx::query("SELECT id, name, price_cents, stock_on_hand FROM products ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn decrement_stock(&self, product_id: ProductId, quantity: u32) -> Result<u32> {
        let mut tx = self.pool.begin().await?;
        let remaining = Self::decrement_in(&mut tx, product_id, quantity).await?;
        tx.commit().await?;
        Ok(remaining)
    }

    async fn release_stock(&self, product_id: ProductId, quantity: u32) -> Result<u32> {
        let stock: Option<i64> = sqlx::query_scalar(
            "UPDATE products SET stock_on_hand = stock_on_hand + $2 WHERE id = $1 RETURNING stock_on_hand",
        )
        .bind(product_id.as_i64())
        .bind(i64::from(quantity))
        .fetch_optional(&self.pool)
        .await?;

        let stock = stock.ok_or(CatalogError::ProductNotFound(product_id))?;
        u32::try_from(stock).map_err(|_| CatalogError::Corrupt {
            product_id,
            reason: format!("stock_on_hand {stock} out of range"),
        })
    }

    /// Decrements every request inside one transaction.
    ///
    /// Rows are locked in product id order. A refused decrement drops the
    /// transaction, which rolls back the decrements already applied.
    async fn decrement_all(&self, requests: &[StockRequest]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for request in lock_order(requests) {
            Self::decrement_in(&mut tx, request.product_id, request.quantity).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
