//! Loading and saving orders through an [`OrderStore`].

use common::{LineItemId, OrderId};
use order_store::{OrderQuery, OrderStore, SaveOptions, Version};

use crate::error::DomainError;
use crate::order::{Order, OrderError};

/// Maps [`Order`] aggregates to and from the order store.
///
/// The repository is responsible for:
/// 1. Rebuilding an aggregate from its stored record
/// 2. Choosing insert or versioned update when saving
/// 3. Carrying the new version back onto the aggregate
pub struct OrderRepository<S: OrderStore> {
    store: S,
}

impl<S: OrderStore> OrderRepository<S> {
    /// Creates a new repository over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying order store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads an order, failing with `OrderNotFound` if it doesn't exist.
    pub async fn load(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.load_existing(order_id)
            .await?
            .ok_or(DomainError::OrderNotFound(order_id))
    }

    /// Loads an order, returning None if it doesn't exist.
    pub async fn load_existing(&self, order_id: OrderId) -> Result<Option<Order>, DomainError> {
        let record = self.store.load_order(order_id).await?;
        Ok(record.map(Order::from_record))
    }

    /// Persists the whole order.
    ///
    /// A never-saved order is inserted; otherwise the write only succeeds if
    /// the stored version still equals the order's version.
    pub async fn save(&self, order: &mut Order) -> Result<Version, DomainError> {
        let current_version = order.version();
        let options = if current_version == Version::initial() {
            SaveOptions::expect_new()
        } else {
            SaveOptions::expect_version(current_version)
        };

        let new_version = self.store.save_order(&order.to_record(), options).await?;
        order.set_version(new_version);
        Ok(new_version)
    }

    /// Removes one line item in storage and mirrors the change on `order`.
    pub async fn delete_item(
        &self,
        order: &mut Order,
        item_id: LineItemId,
    ) -> Result<Version, DomainError> {
        if order.get_item(item_id).is_none() {
            return Err(OrderError::ItemNotFound { item_id }.into());
        }

        let new_version = self
            .store
            .delete_line_item(
                order.id(),
                item_id,
                SaveOptions::expect_version(order.version()),
            )
            .await?;

        order.remove_item(item_id)?;
        order.set_version(new_version);
        Ok(new_version)
    }

    /// Lists orders matching a query.
    pub async fn list(&self, query: OrderQuery) -> Result<Vec<Order>, DomainError> {
        let records = self.store.list_orders(query).await?;
        Ok(records.into_iter().map(Order::from_record).collect())
    }
}
