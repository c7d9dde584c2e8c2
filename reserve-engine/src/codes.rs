//! Human-short order codes
//!
//! Shape: 3 lowercase letters followed by 5 digits, 8 characters total
//! (e.g. `kfx40917`). The generator minimizes collisions with read-only
//! uniqueness checks; the store's unique constraint at insert time stays
//! the final authority.

use crate::store::{ReservationStore, StoreResult};
use rand::Rng;

/// Code length, letters + digits
pub const CODE_LENGTH: usize = 8;
const LETTERS: usize = 3;
const DIGITS: usize = 5;
/// Characters kept for partial lookup
pub const SUFFIX_LENGTH: usize = 4;

/// Collision-checked order code generator
#[derive(Debug, Clone, Copy)]
pub struct OrderCodeGenerator {
    max_attempts: u32,
}

impl OrderCodeGenerator {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Draw a random candidate of the fixed shape
    fn candidate(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut code = String::with_capacity(CODE_LENGTH);
        for _ in 0..LETTERS {
            code.push(rng.gen_range(b'a'..=b'z') as char);
        }
        for _ in 0..DIGITS {
            code.push(rng.gen_range(b'0'..=b'9') as char);
        }
        code
    }

    /// Generate a code that is unique at the instant of the check.
    ///
    /// Retries up to the configured attempt budget; on exhaustion a fresh
    /// draw gets two extra random digits appended so the call terminates
    /// instead of looping. The widened code is still checked by the store's
    /// unique constraint at insert time.
    pub fn generate_unique(&self, store: &dyn ReservationStore) -> StoreResult<String> {
        for _ in 0..self.max_attempts {
            let code = self.candidate();
            if !store.code_exists(&code)? {
                return Ok(code);
            }
        }

        tracing::warn!(
            attempts = self.max_attempts,
            "Order code attempts exhausted, widening code space"
        );
        let mut rng = rand::thread_rng();
        let mut widened = self.candidate();
        widened.push(rng.gen_range(b'0'..=b'9') as char);
        widened.push(rng.gen_range(b'0'..=b'9') as char);
        Ok(widened)
    }
}

/// Last 4 characters of a code, empty when the code is shorter
pub fn suffix(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    if chars.len() < SUFFIX_LENGTH {
        return String::new();
    }
    chars[chars.len() - SUFFIX_LENGTH..].iter().collect()
}
