use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::ProductId;
use tokio::sync::RwLock;

use crate::catalog::{Catalog, insufficient};
use crate::{CatalogError, Product, Result, StockRequest};

/// In-memory catalog for testing.
///
/// Every stock mutation happens under a single write lock, which makes the
/// check and the decrement one indivisible step.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with the given products.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products.into_iter().map(|p| (p.id, p)).collect();
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    /// Inserts or replaces a product.
    pub async fn upsert(&self, product: Product) {
        self.products.write().await.insert(product.id, product);
    }

    /// Overwrites the stock level of an existing product.
    pub async fn set_stock(&self, product_id: ProductId, stock_on_hand: u32) -> Result<()> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&product_id)
            .ok_or(CatalogError::ProductNotFound(product_id))?;
        product.stock_on_hand = stock_on_hand;
        Ok(())
    }

    /// Returns the stock level of a product, if it exists.
    pub async fn stock_of(&self, product_id: ProductId) -> Option<u32> {
        self.products
            .read()
            .await
            .get(&product_id)
            .map(|p| p.stock_on_hand)
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn get_product(&self, product_id: ProductId) -> Result<Option<Product>> {
        Ok(self.products.read().await.get(&product_id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn decrement_stock(&self, product_id: ProductId, quantity: u32) -> Result<u32> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&product_id)
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        if !product.has_stock_for(quantity) {
            return Err(insufficient(product, quantity));
        }

        product.stock_on_hand -= quantity;
        Ok(product.stock_on_hand)
    }

    async fn release_stock(&self, product_id: ProductId, quantity: u32) -> Result<u32> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&product_id)
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        product.stock_on_hand = product.stock_on_hand.saturating_add(quantity);
        Ok(product.stock_on_hand)
    }

    /// Checks and applies the whole batch under one write lock, so a batch
    /// never observes another batch half applied.
    async fn decrement_all(&self, requests: &[StockRequest]) -> Result<()> {
        let mut products = self.products.write().await;

        let mut needed: BTreeMap<ProductId, u32> = BTreeMap::new();
        for request in requests {
            let total = needed.entry(request.product_id).or_default();
            *total = total.saturating_add(request.quantity);
        }
        for (product_id, quantity) in &needed {
            let product = products
                .get(product_id)
                .ok_or(CatalogError::ProductNotFound(*product_id))?;
            if !product.has_stock_for(*quantity) {
                return Err(insufficient(product, *quantity));
            }
        }

        for (product_id, quantity) in needed {
            if let Some(product) = products.get_mut(&product_id) {
                product.stock_on_hand -= quantity;
            }
        }
        Ok(())
    }
}
