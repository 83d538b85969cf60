//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{LineItemId, Money, OrderId, OrderStatus, ProductId};
use order_store::{OrderRecord, Version};
use serde::{Deserialize, Serialize};

use super::{LineItem, OrderError};

/// Order aggregate root.
///
/// Holds one order and its line items and keeps `total` equal to the sum of
/// the line item totals after every mutation. It does not check status; the
/// lifecycle engine only calls the mutators on `Draft` orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    id: OrderId,

    /// Current version for optimistic concurrency.
    #[serde(default)]
    version: Version,

    /// Person who requested the order.
    requester: String,

    order_date: DateTime<Utc>,

    /// Current status of the order.
    status: OrderStatus,

    /// Items in the order, in insertion order.
    line_items: Vec<LineItem>,

    /// Total amount of the order.
    total: Money,
}

// Construction and persistence mapping
impl Order {
    /// Creates a new, unsaved draft order.
    pub fn draft(
        id: OrderId,
        requester: impl Into<String>,
        order_date: DateTime<Utc>,
        line_items: Vec<LineItem>,
    ) -> Self {
        let mut order = Self {
            id,
            version: Version::initial(),
            requester: requester.into(),
            order_date,
            status: OrderStatus::Draft,
            line_items,
            total: Money::zero(),
        };
        order.refresh_total();
        order
    }

    /// Rebuilds an order from storage, recomputing every total.
    pub fn from_record(record: OrderRecord) -> Self {
        let mut order = Self {
            id: record.id,
            version: record.version,
            requester: record.requester,
            order_date: record.order_date,
            status: record.status,
            line_items: record
                .line_items
                .into_iter()
                .map(LineItem::from_record)
                .collect(),
            total: Money::zero(),
        };
        order.refresh_total();
        order
    }

    pub fn to_record(&self) -> OrderRecord {
        OrderRecord {
            id: self.id,
            version: self.version,
            requester: self.requester.clone(),
            order_date: self.order_date,
            status: self.status,
            total: self.total,
            line_items: self.line_items.iter().map(LineItem::to_record).collect(),
        }
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn requester(&self) -> &str {
        &self.requester
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns all items in the order.
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn get_item(&self, item_id: LineItemId) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.id() == item_id)
    }

    /// Returns the item referencing a product, if any.
    pub fn item_for_product(&self, product_id: ProductId) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Returns the number of items.
    pub fn item_count(&self) -> usize {
        self.line_items.len()
    }

    pub fn has_items(&self) -> bool {
        !self.line_items.is_empty()
    }

    /// Returns the total amount.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Sum of all line item totals.
    pub fn recompute_total(&self) -> Money {
        self.line_items.iter().map(LineItem::total).sum()
    }

    /// Returns true if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

// Mutations
impl Order {
    /// Appends an item. Rejects a second item for the same product.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), OrderError> {
        if item.quantity() == 0 {
            return Err(OrderError::InvalidQuantity {
                quantity: item.quantity(),
            });
        }

        if self.item_for_product(item.product_id()).is_some() {
            return Err(OrderError::DuplicateProduct {
                product_id: item.product_id(),
            });
        }

        self.line_items.push(item);
        self.refresh_total();
        Ok(())
    }

    /// Removes an item and returns it.
    pub fn remove_item(&mut self, item_id: LineItemId) -> Result<LineItem, OrderError> {
        let position = self
            .line_items
            .iter()
            .position(|item| item.id() == item_id)
            .ok_or(OrderError::ItemNotFound { item_id })?;

        let removed = self.line_items.remove(position);
        self.refresh_total();
        Ok(removed)
    }

    /// Overwrites the quantity of an existing item.
    pub fn update_item_quantity(
        &mut self,
        item_id: LineItemId,
        quantity: u32,
    ) -> Result<(), OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity { quantity });
        }

        self.item_mut(item_id)?.set_quantity(quantity);
        self.refresh_total();
        Ok(())
    }

    /// Re-captures the unit price of an existing item.
    pub fn update_item_price(
        &mut self,
        item_id: LineItemId,
        unit_price: Money,
    ) -> Result<(), OrderError> {
        self.item_mut(item_id)?.set_unit_price(unit_price);
        self.refresh_total();
        Ok(())
    }

    pub fn set_requester(&mut self, requester: impl Into<String>) {
        self.requester = requester.into();
    }

    pub(crate) fn transition_to(&mut self, status: OrderStatus) {
        self.status = status;
    }

    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn item_mut(&mut self, item_id: LineItemId) -> Result<&mut LineItem, OrderError> {
        self.line_items
            .iter_mut()
            .find(|item| item.id() == item_id)
            .ok_or(OrderError::ItemNotFound { item_id })
    }

    fn refresh_total(&mut self) {
        self.total = self.recompute_total();
    }
}
