//! Derived stock ledger
//!
//! A product's available quantity is never stored: it is the cumulative
//! supply inflow minus the quantity held by orders in stock-consuming
//! states. Changing an order's status through the state machine *is* the
//! stock adjustment; nothing else writes to this figure.

use crate::store::{ReservationStore, StoreError, StoreResult};
use shared::Product;

/// Stock summary for a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub product_id: i64,
    pub total_received: i64,
    pub consumed: i64,
    pub available: i64,
    pub low_stock: bool,
}

/// Available quantity for a product: `total_received - consumed`.
///
/// The result is non-negative as long as all writers go through the state
/// machine; the store's reserve-time guard makes a negative figure
/// unreachable rather than clamping it away.
pub fn available(store: &dyn ReservationStore, product_id: i64) -> StoreResult<i64> {
    let product = store
        .product(product_id)?
        .ok_or(StoreError::ProductNotFound(product_id))?;
    let consumed = store.consumed_quantity(product_id)?;
    Ok(product.total_received - consumed)
}

/// Full stock summary, including the low-stock flag against `min_stock`
pub fn level(store: &dyn ReservationStore, product_id: i64) -> StoreResult<StockLevel> {
    let product = store
        .product(product_id)?
        .ok_or(StoreError::ProductNotFound(product_id))?;
    let consumed = store.consumed_quantity(product_id)?;
    let available = product.total_received - consumed;
    Ok(StockLevel {
        product_id,
        total_received: product.total_received,
        consumed,
        available,
        low_stock: is_low_stock(&product, available),
    })
}

/// Whether the available quantity sits below the product's threshold
pub fn is_low_stock(product: &Product, available: i64) -> bool {
    available < product.min_stock
}
