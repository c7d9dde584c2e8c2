use crate::store::StoreError;
use shared::{ErrorCode, ErrorDetail, LifecycleEvent, OrderStatus};
use thiserror::Error;

/// Engine errors
///
/// Every variant is a recoverable, expected outcome surfaced to the
/// caller; nothing here is process-fatal.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Transition {event:?} not allowed from {from:?}")]
    InvalidTransition {
        from: OrderStatus,
        event: LifecycleEvent,
    },

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("Order code generation exhausted")]
    CodeGenerationExhausted,

    #[error("Concurrent modification of order {0}")]
    ConcurrentModification(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Store error: {0}")]
    Store(StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict(order_id) => EngineError::ConcurrentModification(order_id),
            StoreError::OrderNotFound(order_id) => EngineError::OrderNotFound(order_id),
            StoreError::ProductNotFound(product_id) => EngineError::ProductNotFound(product_id),
            StoreError::StockExhausted { available, .. } => EngineError::InsufficientStock {
                // Requested amount is supplied at the call site when known
                requested: 0,
                available,
            },
            other => EngineError::Store(other),
        }
    }
}

impl From<EngineError> for ErrorDetail {
    fn from(err: EngineError) -> Self {
        let code = match &err {
            EngineError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            EngineError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            EngineError::CodeGenerationExhausted => ErrorCode::CodeGenerationExhausted,
            EngineError::ConcurrentModification(_) => ErrorCode::ConcurrentModification,
            EngineError::OrderNotFound(_) => ErrorCode::OrderNotFound,
            EngineError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            EngineError::InvalidQuantity(_) => ErrorCode::InvalidQuantity,
            EngineError::Store(e) => {
                tracing::error!(error = %e, "Store error surfaced to caller");
                ErrorCode::StoreError
            }
        };
        ErrorDetail::new(code, err.to_string())
    }
}
