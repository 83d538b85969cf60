//! Order status state machine.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The status of an order in its lifecycle.
///
/// State transitions:
/// ```text
/// Draft ──┬──► Finalized
///         │
///         └──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order is being drafted; items and requester can be changed.
    #[default]
    Draft,

    /// Stock has been committed (terminal state).
    Finalized,

    /// Order was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order and its items can be modified in this state.
    pub fn can_modify(&self) -> bool {
        matches!(self, OrderStatus::Draft)
    }

    pub fn can_finalize(&self) -> bool {
        matches!(self, OrderStatus::Draft)
    }

    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Draft)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        match self {
            OrderStatus::Draft => false,
            OrderStatus::Finalized | OrderStatus::Cancelled => true,
        }
    }

    /// Returns the status name as stored and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "Draft",
            OrderStatus::Finalized => "Finalized",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a stored status string is not one of the known states.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown order status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(OrderStatus::Draft),
            "Finalized" => Ok(OrderStatus::Finalized),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
