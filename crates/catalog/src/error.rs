use common::ProductId;
use thiserror::Error;

/// Errors that can occur when interacting with the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product exists with the given ID.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The compare-and-decrement was refused; stock is unchanged.
    #[error(
        "Insufficient stock for product '{product_name}' ({product_id}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        available: u32,
        requested: u32,
    },

    /// A stored row could not be converted into a product.
    #[error("Corrupt product row {product_id}: {reason}")]
    Corrupt {
        product_id: ProductId,
        reason: String,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
