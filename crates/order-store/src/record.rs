use chrono::{DateTime, Utc};
use common::{LineItemId, Money, OrderId, OrderStatus, ProductId};
use serde::{Deserialize, Serialize};

/// Version number for an order, used for optimistic concurrency control.
///
/// A new, never-saved order is at version 0. The first save stores version 1
/// and every later write increments it by one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// Creates a new version from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the initial version (0) for an unsaved order.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Returns the version (1) of a freshly inserted order.
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the next version.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw version value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Persisted form of a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRecord {
    pub id: LineItemId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
    pub total: Money,
}

/// Persisted form of an order with its line items, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub version: Version,
    pub requester: String,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total: Money,
    pub line_items: Vec<LineItemRecord>,
}

impl OrderRecord {
    /// Sum of the line item totals.
    pub fn line_items_total(&self) -> Money {
        self.line_items.iter().map(|item| item.total).sum()
    }
}
