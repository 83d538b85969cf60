use common::{LineItemId, OrderId};
use thiserror::Error;

use crate::Version;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// The expected version did not match the stored version.
    #[error(
        "Concurrency conflict for order {order_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        order_id: OrderId,
        expected: Version,
        actual: Version,
    },

    /// The order was not found in the store.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The line item was not found on the order.
    #[error("Line item {item_id} not found on order {order_id}")]
    LineItemNotFound {
        order_id: OrderId,
        item_id: LineItemId,
    },

    /// A stored row could not be converted back into a record.
    #[error("Corrupt record for order {order_id}: {reason}")]
    Corrupt { order_id: OrderId, reason: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
