use async_trait::async_trait;
use common::ProductId;

use crate::{CatalogError, Product, Result};

/// One stock movement: `quantity` units of `product_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl StockRequest {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Core trait for catalog implementations.
///
/// All implementations must be thread-safe (Send + Sync) and
/// `decrement_stock` must be safe under concurrent callers for the same product.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Looks up a product. Returns None if the catalog has no such product.
    async fn get_product(&self, product_id: ProductId) -> Result<Option<Product>>;

    /// Lists every product ordered by ID.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Atomically decrements stock if at least `quantity` units are on hand.
    ///
    /// On `InsufficientStock` the stock is left untouched. Returns the stock
    /// remaining after the decrement.
    async fn decrement_stock(&self, product_id: ProductId, quantity: u32) -> Result<u32>;

    /// Returns `quantity` units to stock. Used to undo a decrement.
    async fn release_stock(&self, product_id: ProductId, quantity: u32) -> Result<u32>;

    /// Decrements every request or none of them.
    ///
    /// The default implementation decrements one request at a time, in
    /// [`lock_order`], and on the first failure releases the decrements
    /// already applied before returning that failure.
    async fn decrement_all(&self, requests: &[StockRequest]) -> Result<()> {
        let requests = lock_order(requests);
        let mut applied: Vec<StockRequest> = Vec::with_capacity(requests.len());

        for request in &requests {
            match self
                .decrement_stock(request.product_id, request.quantity)
                .await
            {
                Ok(_) => applied.push(*request),
                Err(err) => {
                    tracing::debug!(
                        product_id = %request.product_id,
                        rollback = applied.len(),
                        "stock decrement refused, releasing earlier decrements"
                    );
                    self.release_all(&applied).await?;
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Releases every request, in reverse order.
    async fn release_all(&self, requests: &[StockRequest]) -> Result<()> {
        for request in requests.iter().rev() {
            self.release_stock(request.product_id, request.quantity)
                .await?;
        }
        Ok(())
    }
}

/// Builds the `InsufficientStock` error for a product that refused a decrement.
/// Returns the requests sorted by product id.
///
/// Batches that touch the same products must take them in one global order,
/// otherwise two opposing batches can each hold a product the other waits on.
pub fn lock_order(requests: &[StockRequest]) -> Vec<StockRequest> {
    let mut ordered = requests.to_vec();
    ordered.sort_by_key(|request| request.product_id);
    ordered
}

pub(crate) fn insufficient(product: &Product, requested: u32) -> CatalogError {
    CatalogError::InsufficientStock {
        product_id: product.id,
        product_name: product.name.clone(),
        available: product.stock_on_hand,
        requested,
    }
}
