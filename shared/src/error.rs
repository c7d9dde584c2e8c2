//! Wire-level error vocabulary
//!
//! The engine's internal error types convert into these structures at the
//! boundary, so embedding layers (HTTP, admin UI, schedulers) get stable
//! machine-readable codes without depending on engine internals.

use serde::{Deserialize, Serialize};

/// Machine-readable error codes surfaced to callers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Event not legal from the order's current status
    InvalidTransition,
    /// Transition would drive available stock negative
    InsufficientStock,
    /// Code generator ran out of retry budget
    CodeGenerationExhausted,
    /// Conflicting write detected, transition not applied
    ConcurrentModification,
    OrderNotFound,
    ProductNotFound,
    InvalidQuantity,
    /// Store rejected or failed the operation
    StoreError,
    InternalError,
}

/// Error payload returned across the engine boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorDetail {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
