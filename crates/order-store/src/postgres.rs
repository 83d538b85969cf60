use async_trait::async_trait;
use common::{LineItemId, Money, OrderId, OrderStatus, ProductId};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::{
    LineItemRecord, OrderQuery, OrderRecord, OrderStoreError, Result, Version,
    store::{OrderStore, SaveOptions},
};

/// PostgreSQL-backed order store implementation.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations (catalog and order tables).
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_order(row: &PgRow, line_items: Vec<LineItemRecord>) -> Result<OrderRecord> {
        let order_id = OrderId::from_uuid(row.try_get::<Uuid, _>("id")?);
        let status: String = row.try_get("status")?;
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| OrderStoreError::Corrupt {
                order_id,
                reason: e.to_string(),
            })?;

        Ok(OrderRecord {
            id: order_id,
            version: Version::new(row.try_get("version")?),
            requester: row.try_get("requester")?,
            order_date: row.try_get("order_date")?,
            status,
            total: Money::from_cents(row.try_get("total_cents")?),
            line_items,
        })
    }

    fn row_to_line_item(order_id: OrderId, row: &PgRow) -> Result<LineItemRecord> {
        let quantity: i64 = row.try_get("quantity")?;
        let quantity = u32::try_from(quantity).map_err(|_| OrderStoreError::Corrupt {
            order_id,
            reason: format!("line item quantity {quantity} out of range"),
        })?;

        Ok(LineItemRecord {
            id: LineItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            quantity,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            total: Money::from_cents(row.try_get("total_cents")?),
        })
    }

    /// Opens a read-only transaction whose statements all see one snapshot.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    async fn fetch_line_items(
        tx: &mut Transaction<'_, Postgres>,
        order_id: OrderId,
    ) -> Result<Vec<LineItemRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, quantity, unit_price_cents, total_cents
            FROM line_items
            WHERE order_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_all(&mut **tx)
        .await?;

        rows.iter()
            .map(|row| Self::row_to_line_item(order_id, row))
            .collect()
    }

    /// Locks the order row and checks its version inside the transaction.
    async fn lock_and_check(
        tx: &mut Transaction<'_, Postgres>,
        order_id: OrderId,
        options: SaveOptions,
    ) -> Result<()> {
        let current: Option<i64> =
            sqlx::query_scalar("SELECT version FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id.as_uuid())
                .fetch_optional(&mut **tx)
                .await?;

        let actual = current.map_or(Version::initial(), Version::new);
        if actual != options.expected_version {
            return Err(OrderStoreError::ConcurrencyConflict {
                order_id,
                expected: options.expected_version,
                actual,
            });
        }
        Ok(())
    }

    async fn insert_line_items(
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
    ) -> Result<()> {
        for (position, item) in order.line_items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO line_items (id, order_id, position, product_id, quantity, unit_price_cents, total_cents)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item.id.as_uuid())
            .bind(order.id.as_uuid())
            .bind(position as i32)
            .bind(item.product_id.as_i64())
            .bind(i64::from(item.quantity))
            .bind(item.unit_price.cents())
            .bind(item.total.cents())
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn load_order(&self, order_id: OrderId) -> Result<Option<OrderRecord>> {
        let mut tx = self.begin_snapshot().await?;
        let row = sqlx::query(
            "SELECT id, requester, order_date, status, total_cents, version FROM orders WHERE id = $1",
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let line_items = Self::fetch_line_items(&mut tx, order_id).await?;
        tx.commit().await?;
        Self::row_to_order(&row, line_items).map(Some)
    }

    async fn save_order(&self, order: &OrderRecord, options: SaveOptions) -> Result<Version> {
        let mut tx = self.pool.begin().await?;
        let new_version = options.expected_version.next();

        if options.is_insert() {
            sqlx::query(
                r#"
                INSERT INTO orders (id, requester, order_date, status, total_cents, version)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(order.id.as_uuid())
            .bind(&order.requester)
            .bind(order.order_date)
            .bind(order.status.as_str())
            .bind(order.total.cents())
            .bind(new_version.as_i64())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                // A concurrent insert of the same order wins the primary key
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return OrderStoreError::ConcurrencyConflict {
                        order_id: order.id,
                        expected: options.expected_version,
                        actual: Version::first(),
                    };
                }
                OrderStoreError::Database(e)
            })?;
        } else {
            Self::lock_and_check(&mut tx, order.id, options).await?;

            sqlx::query(
                r#"
                UPDATE orders
                SET requester = $2, order_date = $3, status = $4, total_cents = $5, version = $6
                WHERE id = $1
                "#,
            )
            .bind(order.id.as_uuid())
            .bind(&order.requester)
            .bind(order.order_date)
            .bind(order.status.as_str())
            .bind(order.total.cents())
            .bind(new_version.as_i64())
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM line_items WHERE order_id = $1")
                .bind(order.id.as_uuid())
                .execute(&mut *tx)
                .await?;
        }

        Self::insert_line_items(&mut tx, order).await?;

        tx.commit().await?;
        Ok(new_version)
    }

    async fn delete_line_item(
        &self,
        order_id: OrderId,
        item_id: LineItemId,
        options: SaveOptions,
    ) -> Result<Version> {
        let mut tx = self.pool.begin().await?;
        Self::lock_and_check(&mut tx, order_id, options).await?;

        let deleted = sqlx::query("DELETE FROM line_items WHERE order_id = $1 AND id = $2")
            .bind(order_id.as_uuid())
            .bind(item_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(OrderStoreError::LineItemNotFound { order_id, item_id });
        }

        let new_version = options.expected_version.next();
        sqlx::query(
            r#"
            UPDATE orders
            SET total_cents = (SELECT COALESCE(SUM(total_cents), 0)::BIGINT FROM line_items WHERE order_id = $1),
                version = $2
            WHERE id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(new_version.as_i64())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(new_version)
    }

    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<OrderRecord>> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, requester, order_date, status, total_cents, version FROM orders WHERE 1=1",
        );

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(ref requester) = query.requester {
            builder.push(" AND requester = ").push_bind(requester.clone());
        }
        builder.push(" ORDER BY order_date ASC, id ASC");
        if let Some(limit) = query.limit {
            builder
                .push(" LIMIT ")
                .push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
        }
        if let Some(offset) = query.offset {
            builder
                .push(" OFFSET ")
                .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
        }

        let mut tx = self.begin_snapshot().await?;
        let rows = builder.build().fetch_all(&mut *tx).await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let order_id = OrderId::from_uuid(row.try_get::<Uuid, _>("id")?);
            let line_items = Self::fetch_line_items(&mut tx, order_id).await?;
            orders.push(Self::row_to_order(&row, line_items)?);
        }
        tx.commit().await?;
        Ok(orders)
    }
}
