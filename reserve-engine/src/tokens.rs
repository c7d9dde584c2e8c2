//! Opaque anonymous-lookup tokens
//!
//! A token is a 32-character alphanumeric string (~190 bits of entropy)
//! that grants read access to exactly one order. Tokens carry no embedded
//! id or signature; the only way to resolve one is a store lookup, so the
//! format leaks nothing. Issued lazily, destroyed on cancellation.

use crate::store::{ReservationStore, StoreError};
use rand::Rng;
use shared::{Order, OrderStatus};

/// Token length in characters
pub const TOKEN_LENGTH: usize = 32;

const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Renders a token into a scannable artifact (QR image bytes).
///
/// Pure function boundary; the engine never touches image bytes itself.
pub trait TokenRenderer: Send + Sync {
    fn render(&self, token: &str) -> Vec<u8>;
}

/// Token issue/validate/lookup/revoke
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenService;

impl TokenService {
    /// Draw a fresh token from the OS RNG
    pub fn mint(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..TOKEN_LENGTH)
            .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
            .collect()
    }

    /// Format check: length and alphabet only, no store access
    pub fn validate_format(&self, token: &str) -> bool {
        token.len() == TOKEN_LENGTH && token.bytes().all(|b| TOKEN_ALPHABET.contains(&b))
    }

    /// Format plus existence: whether the token resolves to a live order
    pub fn validate(
        &self,
        store: &dyn ReservationStore,
        token: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.lookup(store, token)?.is_some())
    }

    /// Resolve a token to its order.
    ///
    /// Cancelled orders are treated as not found even while the token
    /// string is still stored, so a voided order is never readable
    /// anonymously. Malformed tokens short-circuit without a store hit.
    pub fn lookup(
        &self,
        store: &dyn ReservationStore,
        token: &str,
    ) -> Result<Option<Order>, StoreError> {
        if !self.validate_format(token) {
            return Ok(None);
        }
        let order = store.order_by_token(token)?;
        Ok(order.filter(|o| o.status != OrderStatus::Cancelled))
    }

    /// Public lookup path encoded into the QR artifact
    pub fn public_path(&self, token: &str) -> String {
        format!("/o/{token}")
    }
}
