use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::{LineItemId, OrderId};
use tokio::sync::RwLock;

use crate::{
    OrderQuery, OrderRecord, OrderStoreError, Result, Version,
    store::{OrderStore, SaveOptions},
};

/// In-memory order store implementation for testing.
///
/// This implementation keeps every order in memory and provides
/// the same interface as the PostgreSQL implementation.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, OrderRecord>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }
}

fn check_version(
    order_id: OrderId,
    stored: Option<&OrderRecord>,
    options: SaveOptions,
) -> Result<()> {
    let actual = stored.map_or(Version::initial(), |o| o.version);
    if actual != options.expected_version {
        return Err(OrderStoreError::ConcurrencyConflict {
            order_id,
            expected: options.expected_version,
            actual,
        });
    }
    Ok(())
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn load_order(&self, order_id: OrderId) -> Result<Option<OrderRecord>> {
        Ok(self.orders.read().await.get(&order_id).cloned())
    }

    async fn save_order(&self, order: &OrderRecord, options: SaveOptions) -> Result<Version> {
        let mut orders = self.orders.write().await;
        check_version(order.id, orders.get(&order.id), options)?;

        let new_version = options.expected_version.next();
        let mut stored = order.clone();
        stored.version = new_version;
        orders.insert(order.id, stored);

        Ok(new_version)
    }

    async fn delete_line_item(
        &self,
        order_id: OrderId,
        item_id: LineItemId,
        options: SaveOptions,
    ) -> Result<Version> {
        let mut orders = self.orders.write().await;
        let stored = orders
            .get_mut(&order_id)
            .ok_or(OrderStoreError::OrderNotFound(order_id))?;
        check_version(order_id, Some(&*stored), options)?;

        let before = stored.line_items.len();
        stored.line_items.retain(|item| item.id != item_id);
        if stored.line_items.len() == before {
            return Err(OrderStoreError::LineItemNotFound { order_id, item_id });
        }

        stored.total = stored.line_items_total();
        stored.version = stored.version.next();
        Ok(stored.version)
    }

    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<OrderRecord>> {
        let orders = self.orders.read().await;
        let mut matching: Vec<_> = orders
            .values()
            .filter(|o| query.matches(o))
            .cloned()
            .collect();

        matching.sort_by(|a, b| a.order_date.cmp(&b.order_date).then(a.id.cmp(&b.id)));

        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }
}
