//! Product model
//!
//! `total_received` is the cumulative inflow from supply receipts. The
//! available quantity is never stored; it is derived by the stock ledger
//! as inflow minus the stock-consuming orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Cumulative supply inflow
    pub total_received: i64,
    /// Low-stock warning threshold
    pub min_stock: i64,
    /// Planned retail price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_price: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(id: i64, name: impl Into<String>, min_stock: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            total_received: 0,
            // Negative thresholds are meaningless, clamp at creation
            min_stock: min_stock.max(0),
            sell_price: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_sell_price(mut self, price: Decimal) -> Self {
        self.sell_price = Some(price);
        self
    }
}
