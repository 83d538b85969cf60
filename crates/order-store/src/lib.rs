//! Persistence gateway for orders.
//!
//! Orders are saved whole, guarded by a per-order [`Version`] that is compared
//! at write time. A write against a stale version fails with
//! [`OrderStoreError::ConcurrencyConflict`] and is never merged.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod record;
pub mod store;

pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use query::OrderQuery;
pub use record::{LineItemRecord, OrderRecord, Version};
pub use store::{OrderStore, SaveOptions};
