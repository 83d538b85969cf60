//! Domain error types.

use catalog::CatalogError;
use common::OrderId;
use order_store::{OrderStoreError, Version};
use thiserror::Error;

use crate::order::OrderError;

/// Failure category reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input shape: empty requester, future date, zero quantity, no items.
    ValidationFailed,
    /// Order, line item or product absent.
    NotFound,
    DuplicateProduct,
    StockInsufficient,
    ValueExceeded,
    /// Mutating, cancelling or finalizing a non-draft order.
    InvalidTransition,
    ConcurrentModification,
    /// Storage or catalog backend failure.
    Infrastructure,
}

impl ErrorKind {
    /// Returns the label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::NotFound => "not_found",
            ErrorKind::DuplicateProduct => "duplicate_product",
            ErrorKind::StockInsufficient => "stock_insufficient",
            ErrorKind::ValueExceeded => "value_exceeded",
            ErrorKind::InvalidTransition => "invalid_transition",
            ErrorKind::ConcurrentModification => "concurrent_modification",
            ErrorKind::Infrastructure => "infrastructure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Another write to the same order won; retry from a fresh read.
    #[error(
        "Order {order_id} was modified concurrently (expected version {expected}, found {actual})"
    )]
    ConcurrentModification {
        order_id: OrderId,
        expected: Version,
        actual: Version,
    },

    /// Stock was decremented but could not be returned after a failed save.
    #[error("Failed to release stock for order {order_id}: {reason}")]
    RollbackFailed { order_id: OrderId, reason: String },

    /// An error occurred in the order store.
    #[error("Order store error: {0}")]
    Store(OrderStoreError),

    /// An error occurred in the catalog.
    #[error("Catalog error: {0}")]
    Catalog(CatalogError),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Order(e) => e.kind(),
            DomainError::OrderNotFound(_) => ErrorKind::NotFound,
            DomainError::ConcurrentModification { .. } => ErrorKind::ConcurrentModification,
            DomainError::RollbackFailed { .. }
            | DomainError::Store(_)
            | DomainError::Catalog(_) => ErrorKind::Infrastructure,
        }
    }

    /// True when retrying from a fresh read may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::ConcurrentModification | ErrorKind::StockInsufficient
        )
    }
}

impl From<OrderStoreError> for DomainError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::ConcurrencyConflict {
                order_id,
                expected,
                actual,
            } => DomainError::ConcurrentModification {
                order_id,
                expected,
                actual,
            },
            OrderStoreError::OrderNotFound(order_id) => DomainError::OrderNotFound(order_id),
            OrderStoreError::LineItemNotFound { item_id, .. } => {
                DomainError::Order(OrderError::ItemNotFound { item_id })
            }
            other => DomainError::Store(other),
        }
    }
}

impl From<CatalogError> for DomainError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::ProductNotFound(product_id) => {
                DomainError::Order(OrderError::ProductNotFound { product_id })
            }
            CatalogError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            } => DomainError::Order(OrderError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            }),
            other => DomainError::Catalog(other),
        }
    }
}
