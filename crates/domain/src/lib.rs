//! Domain layer for purchase orders.
//!
//! This crate provides:
//! - The `Order` aggregate and its line items
//! - Validation rules, each reporting a typed `OrderError`
//! - `OrderService`, the lifecycle engine driving create, update, cancel and finalize
//! - `OrderRepository` mapping aggregates to the order store
//! - Configuration and tracing setup

pub mod config;
pub mod error;
pub mod order;
pub mod repository;
pub mod telemetry;

pub use config::{Config, LogFormat};
pub use error::{DomainError, ErrorKind};
pub use order::{
    AddItem, CancelOrder, CreateOrder, FinalizeOrder, LineItem, NewLineItem, Order, OrderError,
    OrderService, OrderStatus, QuantityChange, RemoveItem, UpdateQuantities,
};
pub use repository::OrderRepository;
