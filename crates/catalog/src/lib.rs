//! Product catalog gateway.
//!
//! Read-only product lookup plus the stock ledger. Stock is only ever changed
//! through [`Catalog::decrement_stock`], a single compare-and-decrement, and its
//! inverse [`Catalog::release_stock`].

pub mod catalog;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod product;

pub use catalog::{Catalog, StockRequest, lock_order};
pub use error::{CatalogError, Result};
pub use memory::InMemoryCatalog;
pub use postgres::PostgresCatalog;
pub use product::Product;
