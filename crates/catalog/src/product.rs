use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A product as seen through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Current unit price.
    pub price: Money,
    pub stock_on_hand: u32,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: Money, stock_on_hand: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            stock_on_hand,
        }
    }

    /// Returns true if at least `quantity` units are on hand.
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock_on_hand >= quantity
    }
}
