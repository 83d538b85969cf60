use async_trait::async_trait;
use common::{LineItemId, OrderId};

use crate::{OrderQuery, OrderRecord, Result, Version};

/// Options for writing an order to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Version the stored order must be at for the write to succeed.
    /// `Version::initial()` means the order must not exist yet.
    pub expected_version: Version,
}

impl SaveOptions {
    /// Creates options expecting the order to be at a specific version.
    pub fn expect_version(version: Version) -> Self {
        Self {
            expected_version: version,
        }
    }

    /// Creates options expecting the order to not exist (new order).
    pub fn expect_new() -> Self {
        Self {
            expected_version: Version::initial(),
        }
    }

    /// Returns true if these options describe an insert.
    pub fn is_insert(&self) -> bool {
        self.expected_version == Version::initial()
    }
}

/// Core trait for order store implementations.
///
/// All implementations must be thread-safe (Send + Sync) and must compare
/// the expected version and write in one atomic step.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Loads an order with its line items.
    ///
    /// Returns None if the order doesn't exist.
    async fn load_order(&self, order_id: OrderId) -> Result<Option<OrderRecord>>;

    /// Saves the full order, replacing its stored line items.
    ///
    /// Fails with `ConcurrencyConflict` if the stored version is not
    /// `options.expected_version`. Returns the new version.
    async fn save_order(&self, order: &OrderRecord, options: SaveOptions) -> Result<Version>;

    /// Deletes one line item and recomputes the stored order total.
    ///
    /// Same version check as `save_order`. Returns the new version.
    async fn delete_line_item(
        &self,
        order_id: OrderId,
        item_id: LineItemId,
        options: SaveOptions,
    ) -> Result<Version>;

    /// Lists orders matching a query.
    async fn list_orders(&self, query: OrderQuery) -> Result<Vec<OrderRecord>>;
}
