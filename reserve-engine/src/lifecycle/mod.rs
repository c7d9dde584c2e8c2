//! Reservation state machine
//!
//! [`OrderEngine`] is the single entry point for every order mutation:
//!
//! ```text
//! transition(order_id, event)
//!     ├─ 1. Load order (fresh read)
//!     ├─ 2. Validate event against the transition table
//!     ├─ 3. Apply status, timestamps, reservation window, token effects
//!     ├─ 4. Conditional write (WHERE version = ?), stock guard on reserve
//!     └─ 5. On version conflict: retry once from step 1, then surface
//! ```
//!
//! No mutation happens before step 4 commits; a rejected transition leaves
//! the order and the stock figure untouched. The expiry sweeper drives the
//! same `Expire` path as manual calls.

mod error;
pub use error::*;

use crate::clock::Clock;
use crate::codes::{self, OrderCodeGenerator};
use crate::config::EngineConfig;
use crate::stock;
use crate::store::{ReservationStore, StockGuard, StoreError};
use crate::tokens::TokenService;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{LifecycleEvent, NewOrder, Order, OrderStatus};
use std::sync::Arc;

/// Order lifecycle engine
///
/// Clock and store come in through the constructor; the engine holds no
/// process-global state, so tests can drive time and storage directly.
pub struct OrderEngine {
    store: Arc<dyn ReservationStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    codes: OrderCodeGenerator,
    tokens: TokenService,
}

impl OrderEngine {
    pub fn new(
        store: Arc<dyn ReservationStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        let codes = OrderCodeGenerator::new(config.code_max_attempts);
        Self {
            store,
            clock,
            config,
            codes,
            tokens: TokenService,
        }
    }

    pub fn store(&self) -> &Arc<dyn ReservationStore> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========== Creation ==========

    /// Create an order in `CREATED_UNPAID`.
    ///
    /// Allocates a unique code; the insert is retried on a code collision
    /// (the store's unique constraint is the final authority) up to the
    /// configured budget.
    pub fn create_order(&self, input: NewOrder) -> EngineResult<Order> {
        if input.quantity <= 0 {
            return Err(EngineError::InvalidQuantity(input.quantity));
        }
        let product = self
            .store
            .product(input.product_id)?
            .ok_or(EngineError::ProductNotFound(input.product_id))?;
        let unit_price = input
            .unit_price
            .or(product.sell_price)
            .unwrap_or(Decimal::ZERO);
        let now = self.clock.now();

        let attempts = self.config.code_max_attempts.max(1);
        for _ in 0..attempts {
            let code = self.codes.generate_unique(&*self.store)?;
            let order = Order::create(
                input.clone(),
                code,
                product.name.clone(),
                unit_price,
                now,
            );
            match self.store.insert_order(&order) {
                Ok(()) => {
                    tracing::info!(
                        order_id = %order.id,
                        code = %order.code,
                        product_id = order.product_id,
                        quantity = order.quantity,
                        "Order created"
                    );
                    return Ok(order);
                }
                Err(StoreError::Duplicate { field: "code", .. }) => {
                    tracing::warn!(code = %order.code, "Order code collided at insert, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(EngineError::CodeGenerationExhausted)
    }

    // ========== Transitions ==========

    /// Apply a lifecycle event to an order.
    ///
    /// A conflicting concurrent write is retried once with a fresh read;
    /// a second conflict surfaces as `ConcurrentModification`.
    pub fn transition(&self, order_id: &str, event: LifecycleEvent) -> EngineResult<Order> {
        match self.try_transition(order_id, event) {
            Err(EngineError::ConcurrentModification(_)) => {
                tracing::warn!(order_id, ?event, "Version conflict, retrying transition");
                self.try_transition(order_id, event)
            }
            other => other,
        }
    }

    fn try_transition(&self, order_id: &str, event: LifecycleEvent) -> EngineResult<Order> {
        let order = self
            .store
            .order(order_id)?
            .ok_or_else(|| EngineError::OrderNotFound(order_id.to_string()))?;
        let from = order.status;
        let next = from
            .next(event)
            .ok_or(EngineError::InvalidTransition { from, event })?;

        let now = self.clock.now();
        let mut updated = order.clone();
        updated.status = next;
        updated.updated_at = now;

        let mut guard = None;
        match event {
            LifecycleEvent::Reserve => {
                let available = stock::available(&*self.store, order.product_id)?;
                let requested = i64::from(order.quantity);
                if requested > available {
                    return Err(EngineError::InsufficientStock {
                        requested,
                        available,
                    });
                }
                updated.reserved_until = Some(now + self.config.reservation_window());
                if updated.token.is_none() {
                    updated.token = Some(self.tokens.mint());
                }
                // Re-checked inside the store write against racing reserves
                guard = Some(StockGuard {
                    product_id: order.product_id,
                });
            }
            LifecycleEvent::ConfirmPayment => {
                updated.paid_at = Some(now);
                updated.reserved_until = None;
            }
            LifecycleEvent::MarkAwaitingFulfillment => {}
            LifecycleEvent::MarkReady => {
                updated.fulfilled_at = Some(now);
            }
            LifecycleEvent::Complete => {
                updated.completed_at = Some(now);
            }
            LifecycleEvent::Expire => {
                // Only a deadline actually in the past may expire
                if order.reserved_until.is_none_or(|deadline| deadline >= now) {
                    return Err(EngineError::InvalidTransition { from, event });
                }
                updated.reserved_until = None;
            }
            LifecycleEvent::Cancel => {
                updated.reserved_until = None;
                updated.token = None;
                updated.token_image_path = None;
            }
        }

        let stored = match self.store.update_order(&updated, order.version, guard) {
            Ok(stored) => stored,
            Err(StoreError::StockExhausted { available, .. }) => {
                return Err(EngineError::InsufficientStock {
                    requested: i64::from(order.quantity),
                    available,
                });
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            order_id = %stored.id,
            from = ?from,
            to = ?stored.status,
            ?event,
            "Order transitioned"
        );
        Ok(stored)
    }

    // ========== Expiry ==========

    /// Force reservations past deadline through `Expire`.
    ///
    /// Returns the number of orders expired. Per-order failures are logged
    /// and skipped; an order paid between the query and the transition is
    /// rejected by the table and counts as a no-op, no extra locking.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let ids = match self.store.reserved_past_deadline(now) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, "Expiry sweep query failed");
                return 0;
            }
        };

        let mut expired = 0;
        for order_id in ids {
            match self.transition(&order_id, LifecycleEvent::Expire) {
                Ok(_) => expired += 1,
                Err(EngineError::InvalidTransition { from, .. }) => {
                    tracing::debug!(
                        order_id,
                        ?from,
                        "Order resolved between sweep query and expire, skipping"
                    );
                }
                Err(e) => {
                    tracing::warn!(order_id, error = %e, "Failed to expire order, continuing sweep");
                }
            }
        }
        expired
    }

    // ========== Tokens ==========

    /// Issue (or return the existing) lookup token for an order.
    ///
    /// Idempotent. Cancelled orders are treated as not found so a voided
    /// order can never regain anonymous access.
    pub fn issue_token(&self, order_id: &str) -> EngineResult<String> {
        // One fresh-read retry on a lost race, same policy as transitions
        for attempt in 0..2 {
            let order = self
                .store
                .order(order_id)?
                .ok_or_else(|| EngineError::OrderNotFound(order_id.to_string()))?;
            if order.status == OrderStatus::Cancelled {
                return Err(EngineError::OrderNotFound(order_id.to_string()));
            }
            if let Some(token) = order.token {
                return Ok(token);
            }

            let mut updated = order.clone();
            let token = self.tokens.mint();
            updated.token = Some(token.clone());
            updated.updated_at = self.clock.now();
            match self.store.update_order(&updated, order.version, None) {
                Ok(_) => return Ok(token),
                Err(StoreError::VersionConflict(_)) if attempt == 0 => {
                    // The winner may already have issued one; re-read
                    tracing::debug!(order_id, "Token issue raced, re-reading");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(EngineError::ConcurrentModification(order_id.to_string()))
    }

    /// Resolve a lookup token; cancelled orders read as `None`
    pub fn lookup_by_token(&self, token: &str) -> EngineResult<Option<Order>> {
        Ok(self.tokens.lookup(&*self.store, token)?)
    }

    // ========== Queries ==========

    pub fn order(&self, order_id: &str) -> EngineResult<Option<Order>> {
        Ok(self.store.order(order_id)?)
    }

    /// Find orders by full code or 4-character suffix.
    ///
    /// Full codes can exceed the base length when the generator had to
    /// widen, so anything at least code-length long is passed through.
    pub fn find_by_code(&self, term: &str) -> EngineResult<Vec<Order>> {
        if term.len() != codes::SUFFIX_LENGTH && term.len() < codes::CODE_LENGTH {
            return Ok(Vec::new());
        }
        Ok(self.store.orders_by_code(term)?)
    }

    /// Current stock summary for a product
    pub fn stock_level(&self, product_id: i64) -> EngineResult<stock::StockLevel> {
        Ok(stock::level(&*self.store, product_id)?)
    }
}

#[cfg(test)]
mod tests;
