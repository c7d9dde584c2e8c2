//! In-memory reference store
//!
//! Single `RwLock` over the whole state: every write runs under one
//! exclusive lock, which gives the same atomicity a relational backend
//! provides per row transaction. Good for tests and for embedders that
//! accept losing state on restart.

use super::{ReservationStore, StockGuard, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::{Order, Product};
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    products: HashMap<i64, Product>,
    orders: HashMap<String, Order>,
    /// lowercased code -> order id (unique constraint)
    codes: HashMap<String, String>,
    /// token -> order id (unique constraint)
    tokens: HashMap<String, String>,
}

impl Inner {
    fn consumed(&self, product_id: i64) -> i64 {
        self.orders
            .values()
            .filter(|o| o.product_id == product_id && o.status.consumes_stock())
            .map(|o| i64::from(o.quantity))
            .sum()
    }

    fn available(&self, product_id: i64) -> StoreResult<i64> {
        let product = self
            .products
            .get(&product_id)
            .ok_or(StoreError::ProductNotFound(product_id))?;
        Ok(product.total_received - self.consumed(product_id))
    }
}

/// Reference [`ReservationStore`] backed by process memory
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReservationStore for MemoryStore {
    fn insert_product(&self, product: Product) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if inner.products.contains_key(&product.id) {
            return Err(StoreError::Duplicate {
                field: "product_id",
                value: product.id.to_string(),
            });
        }
        inner.products.insert(product.id, product);
        Ok(())
    }

    fn product(&self, product_id: i64) -> StoreResult<Option<Product>> {
        Ok(self.inner.read().products.get(&product_id).cloned())
    }

    fn record_receipt(
        &self,
        product_id: i64,
        quantity: i64,
        now: DateTime<Utc>,
    ) -> StoreResult<Product> {
        let mut inner = self.inner.write();
        let product = inner
            .products
            .get_mut(&product_id)
            .ok_or(StoreError::ProductNotFound(product_id))?;
        product.total_received += quantity;
        product.updated_at = now;
        Ok(product.clone())
    }

    fn consumed_quantity(&self, product_id: i64) -> StoreResult<i64> {
        Ok(self.inner.read().consumed(product_id))
    }

    fn insert_order(&self, order: &Order) -> StoreResult<()> {
        let mut inner = self.inner.write();
        if inner.orders.contains_key(&order.id) {
            return Err(StoreError::Duplicate {
                field: "id",
                value: order.id.clone(),
            });
        }
        let code_key = order.code.to_lowercase();
        if inner.codes.contains_key(&code_key) {
            return Err(StoreError::Duplicate {
                field: "code",
                value: order.code.clone(),
            });
        }
        if let Some(token) = &order.token {
            if inner.tokens.contains_key(token) {
                return Err(StoreError::Duplicate {
                    field: "token",
                    value: token.clone(),
                });
            }
            inner.tokens.insert(token.clone(), order.id.clone());
        }
        inner.codes.insert(code_key, order.id.clone());
        inner.orders.insert(order.id.clone(), order.clone());
        Ok(())
    }

    fn order(&self, order_id: &str) -> StoreResult<Option<Order>> {
        Ok(self.inner.read().orders.get(order_id).cloned())
    }

    fn order_by_token(&self, token: &str) -> StoreResult<Option<Order>> {
        let inner = self.inner.read();
        Ok(inner
            .tokens
            .get(token)
            .and_then(|id| inner.orders.get(id))
            .cloned())
    }

    fn orders_by_code(&self, term: &str) -> StoreResult<Vec<Order>> {
        let term = term.to_lowercase();
        let inner = self.inner.read();
        if term.len() == 4 {
            let mut matches: Vec<Order> = inner
                .orders
                .values()
                .filter(|o| o.code_suffix.to_lowercase() == term)
                .cloned()
                .collect();
            matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            return Ok(matches);
        }
        Ok(inner
            .codes
            .get(&term)
            .and_then(|id| inner.orders.get(id))
            .cloned()
            .into_iter()
            .collect())
    }

    fn code_exists(&self, code: &str) -> StoreResult<bool> {
        Ok(self.inner.read().codes.contains_key(&code.to_lowercase()))
    }

    fn update_order(
        &self,
        order: &Order,
        expected_version: u64,
        guard: Option<StockGuard>,
    ) -> StoreResult<Order> {
        let mut inner = self.inner.write();
        let current = inner
            .orders
            .get(&order.id)
            .ok_or_else(|| StoreError::OrderNotFound(order.id.clone()))?;
        if current.version != expected_version {
            return Err(StoreError::VersionConflict(order.id.clone()));
        }

        // Token index maintenance (issue or revoke within this write)
        let previous_token = current.token.clone();
        if let Some(token) = &order.token
            && previous_token.as_ref() != Some(token)
            && inner.tokens.contains_key(token)
        {
            return Err(StoreError::Duplicate {
                field: "token",
                value: token.clone(),
            });
        }

        let mut stored = order.clone();
        stored.version = expected_version + 1;
        let previous = inner.orders.insert(order.id.clone(), stored.clone());

        if let Some(StockGuard { product_id }) = guard {
            let available = inner.available(product_id)?;
            if available < 0 {
                // Roll the write back; the transition must not apply
                match previous {
                    Some(prev) => {
                        inner.orders.insert(order.id.clone(), prev);
                    }
                    None => {
                        inner.orders.remove(&order.id);
                    }
                }
                return Err(StoreError::StockExhausted {
                    product_id,
                    available: available + i64::from(order.quantity),
                });
            }
        }

        if previous_token != stored.token {
            if let Some(old) = &previous_token {
                inner.tokens.remove(old);
            }
            if let Some(new) = &stored.token {
                inner.tokens.insert(new.clone(), order.id.clone());
            }
        }

        Ok(stored)
    }

    fn reserved_past_deadline(&self, now: DateTime<Utc>) -> StoreResult<Vec<String>> {
        let inner = self.inner.read();
        let mut ids: Vec<String> = inner
            .orders
            .values()
            .filter(|o| o.is_reservation_expired(now))
            .map(|o| o.id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}
