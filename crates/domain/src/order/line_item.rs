use common::{LineItemId, Money, ProductId};
use order_store::LineItemRecord;
use serde::{Deserialize, Serialize};

/// One product/quantity/price entry within an order.
///
/// `unit_price` is copied from the catalog when the item is added or updated
/// and is not linked to later price changes. `total` is always
/// `quantity * unit_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    id: LineItemId,
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
    total: Money,
}

impl LineItem {
    /// Creates a line item with a fresh ID.
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> Self {
        Self {
            id: LineItemId::new(),
            product_id,
            quantity,
            unit_price,
            total: unit_price.multiply(quantity),
        }
    }

    pub fn id(&self) -> LineItemId {
        self.id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Returns `quantity * unit_price`.
    pub fn total(&self) -> Money {
        self.total
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        self.total = self.unit_price.multiply(quantity);
    }

    pub(crate) fn set_unit_price(&mut self, unit_price: Money) {
        self.unit_price = unit_price;
        self.total = unit_price.multiply(self.quantity);
    }

    /// Rebuilds an item from storage. The stored total is ignored and recomputed.
    pub(crate) fn from_record(record: LineItemRecord) -> Self {
        Self {
            id: record.id,
            product_id: record.product_id,
            quantity: record.quantity,
            unit_price: record.unit_price,
            total: record.unit_price.multiply(record.quantity),
        }
    }

    pub(crate) fn to_record(&self) -> LineItemRecord {
        LineItemRecord {
            id: self.id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total: self.total,
        }
    }
}
