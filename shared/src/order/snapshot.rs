//! The unified `Order` aggregate
//!
//! One order row covers both warehouse-entered and storefront orders,
//! discriminated by [`OrderSource`]. Orders are created once and then
//! mutated only through state-machine transitions; the `version` counter
//! backs the store's conditional update.

use super::types::{OrderSource, OrderStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Input for order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub product_id: i64,
    pub quantity: i32,
    /// Unit price override; defaults to the product's sell price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_city: Option<String>,
    #[serde(default)]
    pub source: OrderSource,
}

/// A customer order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Internal id (UUID v4)
    pub id: String,
    /// Human-short code, unique across all orders
    pub code: String,
    /// Last 4 characters of `code`, denormalized for partial lookup
    pub code_suffix: String,
    pub source: OrderSource,

    // === Customer ===
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_city: Option<String>,

    // === Product (name denormalized for history) ===
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_amount: Decimal,

    // === Lifecycle ===
    pub status: OrderStatus,
    /// End of the reservation window; present only while a reservation
    /// is held or was held and not yet resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_until: Option<DateTime<Utc>>,

    // === Anonymous lookup ===
    /// Opaque lookup token; cleared on cancellation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Derived QR artifact path, follows the token's lifecycle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_image_path: Option<String>,

    // === Metadata ===
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfilled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Monotonic version counter for conditional updates
    pub version: u64,
}

impl Order {
    /// Build a fresh order in the initial state.
    ///
    /// `code` must already be allocated; the store's unique constraint is
    /// the final authority on its uniqueness.
    pub fn create(
        input: NewOrder,
        code: String,
        product_name: String,
        unit_price: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        let code_suffix = code.chars().skip(code.chars().count().saturating_sub(4)).collect();
        let total_amount = unit_price * Decimal::from(input.quantity);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code,
            code_suffix,
            source: input.source,
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            customer_city: input.customer_city,
            product_id: input.product_id,
            product_name,
            quantity: input.quantity,
            unit_price,
            total_amount,
            status: OrderStatus::CreatedUnpaid,
            reserved_until: None,
            token: None,
            token_image_path: None,
            created_at: now,
            updated_at: now,
            paid_at: None,
            fulfilled_at: None,
            completed_at: None,
            version: 0,
        }
    }

    /// Whether the order currently holds an active reservation
    pub fn is_actively_reserved(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Reserved
            && self.reserved_until.is_some_and(|deadline| deadline > now)
    }

    /// Whether the reservation deadline has passed (sweep-eligible)
    pub fn is_reservation_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == OrderStatus::Reserved
            && self.reserved_until.is_some_and(|deadline| deadline < now)
    }
}
