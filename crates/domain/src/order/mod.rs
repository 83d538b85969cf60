//! Order aggregate and related types.

mod aggregate;
mod commands;
mod line_item;
pub mod rules;
mod service;

pub use aggregate::Order;
pub use commands::*;
pub use common::OrderStatus;
pub use line_item::LineItem;
pub use service::OrderService;

use chrono::{DateTime, Utc};
use common::{LineItemId, Money, ProductId};
use thiserror::Error;

use crate::error::ErrorKind;

/// Rule violations raised while validating or mutating an order.
///
/// The `Display` text of each variant is the reason shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Requester is empty or whitespace.
    #[error("Requester is required")]
    RequesterRequired,

    #[error("Order date {order_date} cannot be in the future")]
    FutureOrderDate { order_date: DateTime<Utc> },

    /// Order has no items.
    #[error("Order must contain at least one item")]
    NoItems,

    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: ProductId },

    /// Item not found in order.
    #[error("Line item not found: {item_id}")]
    ItemNotFound { item_id: LineItemId },

    #[error(
        "Product {product_id} is already on the order; update the existing item's quantity instead"
    )]
    DuplicateProduct { product_id: ProductId },

    #[error(
        "Insufficient stock for product '{product_name}' ({product_id}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        available: u32,
        requested: u32,
    },

    #[error("Order total {total} exceeds the limit of {ceiling}")]
    ValueExceeded { total: Money, ceiling: Money },

    /// Order is not in a state that allows the action.
    #[error("Invalid state transition: cannot {action} from {current_state} state")]
    InvalidStateTransition {
        current_state: OrderStatus,
        action: &'static str,
    },
}

impl OrderError {
    /// Classifies the violation.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::RequesterRequired
            | OrderError::FutureOrderDate { .. }
            | OrderError::NoItems
            | OrderError::InvalidQuantity { .. } => ErrorKind::ValidationFailed,
            OrderError::ProductNotFound { .. } | OrderError::ItemNotFound { .. } => {
                ErrorKind::NotFound
            }
            OrderError::DuplicateProduct { .. } => ErrorKind::DuplicateProduct,
            OrderError::InsufficientStock { .. } => ErrorKind::StockInsufficient,
            OrderError::ValueExceeded { .. } => ErrorKind::ValueExceeded,
            OrderError::InvalidStateTransition { .. } => ErrorKind::InvalidTransition,
        }
    }
}
