//! Shared value types used by the catalog, the order store and the domain layer.

pub mod money;
pub mod status;
pub mod types;

pub use money::Money;
pub use status::{OrderStatus, ParseStatusError};
pub use types::{LineItemId, OrderId, ProductId};
