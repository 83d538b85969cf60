//! Validation rules.
//!
//! Pure predicates evaluated against an order and catalog data. Each returns
//! `Ok` or the [`OrderError`] whose message is shown to the caller. The engine
//! composes them left to right and stops at the first failure.

use catalog::Product;
use chrono::{DateTime, Utc};
use common::{Money, ProductId};

use super::{LineItem, Order, OrderError};

pub fn requester_required(requester: &str) -> Result<(), OrderError> {
    if requester.trim().is_empty() {
        return Err(OrderError::RequesterRequired);
    }
    Ok(())
}

pub fn date_not_future(order_date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), OrderError> {
    if order_date > now {
        return Err(OrderError::FutureOrderDate { order_date });
    }
    Ok(())
}

/// Only checked when an order is created.
pub fn non_empty_order<T>(items: &[T]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::NoItems);
    }
    Ok(())
}

pub fn quantity_positive(quantity: u32) -> Result<(), OrderError> {
    if quantity == 0 {
        return Err(OrderError::InvalidQuantity { quantity });
    }
    Ok(())
}

/// Passes the looked-up product through when it exists.
pub fn product_exists(
    product_id: ProductId,
    product: Option<Product>,
) -> Result<Product, OrderError> {
    product.ok_or(OrderError::ProductNotFound { product_id })
}

pub fn stock_sufficient(product: &Product, requested: u32) -> Result<(), OrderError> {
    if !product.has_stock_for(requested) {
        return Err(OrderError::InsufficientStock {
            product_id: product.id,
            product_name: product.name.clone(),
            available: product.stock_on_hand,
            requested,
        });
    }
    Ok(())
}

pub fn no_duplicate_product(order: &Order, product_id: ProductId) -> Result<(), OrderError> {
    no_duplicate_in(order.line_items(), product_id)
}

/// Same as [`no_duplicate_product`] for items not yet attached to an order.
pub fn no_duplicate_in(items: &[LineItem], product_id: ProductId) -> Result<(), OrderError> {
    if items.iter().any(|item| item.product_id() == product_id) {
        return Err(OrderError::DuplicateProduct { product_id });
    }
    Ok(())
}

/// Applied after every change that can raise the total.
pub fn value_ceiling(total: Money, ceiling: Money) -> Result<(), OrderError> {
    if total > ceiling {
        return Err(OrderError::ValueExceeded { total, ceiling });
    }
    Ok(())
}
