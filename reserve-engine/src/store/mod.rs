//! Persistence boundary
//!
//! The engine owns no database. It talks to a [`ReservationStore`], which
//! any relational backend can implement as long as it provides:
//!
//! | Guarantee | Used for |
//! |-----------|----------|
//! | unique constraint on `code` | final authority on code collisions |
//! | unique constraint on `token` | final authority on token collisions |
//! | conditional update (`WHERE id = ? AND version = ?`) | transition atomicity per order |
//! | in-write stock re-check ([`StockGuard`]) | `available >= 0` under concurrent reserves |
//!
//! A zero-row conditional update must surface as
//! [`StoreError::VersionConflict`], never as silent success. Store calls
//! are expected to be bounded; a timeout means the write was *not* applied.
//!
//! [`MemoryStore`] is the reference implementation used by the test suite
//! and by embedders that do not need durability.

mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use shared::{Order, Product};
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error("Version conflict on order {0}")]
    VersionConflict(String),

    #[error("Stock exhausted for product {product_id}: {available} available")]
    StockExhausted { product_id: i64, available: i64 },

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Stock re-check requested alongside a conditional write.
///
/// The store must re-derive the product's available quantity inside the
/// same transaction as the order write and fail the whole write with
/// [`StoreError::StockExhausted`] if it would go negative. This is the
/// SQL `UPDATE ... WHERE (SELECT ...) >= qty` analogue and the reason
/// concurrent reserves of different orders cannot oversell.
#[derive(Debug, Clone, Copy)]
pub struct StockGuard {
    pub product_id: i64,
}

/// Transactional order/product store
pub trait ReservationStore: Send + Sync {
    // ========== Products ==========

    fn insert_product(&self, product: Product) -> StoreResult<()>;

    fn product(&self, product_id: i64) -> StoreResult<Option<Product>>;

    /// Record a supply receipt (inflow). Distinct from and simpler than the
    /// transition-driven stock path; returns the updated product.
    fn record_receipt(
        &self,
        product_id: i64,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> StoreResult<Product>;

    /// Sum of `quantity` over this product's orders in stock-consuming states
    fn consumed_quantity(&self, product_id: i64) -> StoreResult<i64>;

    // ========== Orders ==========

    /// Insert a new order. Enforces code and token uniqueness.
    fn insert_order(&self, order: &Order) -> StoreResult<()>;

    fn order(&self, order_id: &str) -> StoreResult<Option<Order>>;

    fn order_by_token(&self, token: &str) -> StoreResult<Option<Order>>;

    /// Find orders by full code, or by the 4-character suffix when the
    /// term is exactly 4 characters. Case-insensitive.
    fn orders_by_code(&self, term: &str) -> StoreResult<Vec<Order>>;

    fn code_exists(&self, code: &str) -> StoreResult<bool>;

    /// Conditional write: applies `order` only if the stored version equals
    /// `expected_version`, bumping the version by one. With a [`StockGuard`]
    /// the product's availability is re-checked inside the same write.
    /// Returns the stored order (with the new version).
    fn update_order(
        &self,
        order: &Order,
        expected_version: u64,
        guard: Option<StockGuard>,
    ) -> StoreResult<Order>;

    /// Ids of `RESERVED` orders whose deadline lies strictly before `now`
    fn reserved_past_deadline(&self, now: DateTime<Utc>) -> StoreResult<Vec<String>>;
}
