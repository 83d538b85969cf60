//! Order commands.
//!
//! Each command carries the inputs of one engine operation. They deserialize
//! directly from a transport payload.

use chrono::{DateTime, Utc};
use common::{LineItemId, OrderId, ProductId};
use serde::{Deserialize, Serialize};

/// Requested product and quantity; the price is captured from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl NewLineItem {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Command to create a new draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    /// The person placing the order.
    pub requester: String,

    pub order_date: DateTime<Utc>,

    /// Initial items; must not be empty.
    pub items: Vec<NewLineItem>,
}

impl CreateOrder {
    pub fn new(
        requester: impl Into<String>,
        order_date: DateTime<Utc>,
        items: Vec<NewLineItem>,
    ) -> Self {
        Self {
            requester: requester.into(),
            order_date,
            items,
        }
    }

    /// Creates a CreateOrder command dated now.
    pub fn now(requester: impl Into<String>, items: Vec<NewLineItem>) -> Self {
        Self::new(requester, Utc::now(), items)
    }
}

/// Command to add an item to a draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
}

impl AddItem {
    pub fn new(order_id: OrderId, product_id: ProductId, quantity: u32) -> Self {
        Self {
            order_id,
            product_id,
            quantity,
        }
    }
}

/// New quantity for one existing line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChange {
    pub item_id: LineItemId,
    pub quantity: u32,
}

/// Command to change the requester and item quantities of a draft order.
///
/// Items not listed keep their quantity. Entries for items that are not on
/// the order are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateQuantities {
    pub order_id: OrderId,

    /// Replacement requester; `None` keeps the current one.
    #[serde(default)]
    pub requester: Option<String>,

    #[serde(default)]
    pub quantities: Vec<QuantityChange>,
}

impl UpdateQuantities {
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            requester: None,
            quantities: Vec::new(),
        }
    }

    pub fn requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    pub fn quantity(mut self, item_id: LineItemId, quantity: u32) -> Self {
        self.quantities.push(QuantityChange { item_id, quantity });
        self
    }
}

/// Command to remove an item from a draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveItem {
    pub order_id: OrderId,
    pub item_id: LineItemId,
}

impl RemoveItem {
    pub fn new(order_id: OrderId, item_id: LineItemId) -> Self {
        Self { order_id, item_id }
    }
}

/// Command to cancel a draft order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelOrder {
    pub order_id: OrderId,
}

impl CancelOrder {
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }
}

/// Command to finalize a draft order and commit its stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeOrder {
    pub order_id: OrderId,
}

impl FinalizeOrder {
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }
}
