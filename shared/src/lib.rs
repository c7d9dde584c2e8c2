//! Shared types for the reservation engine
//!
//! Common types used by the engine crate and any embedding layer:
//! order aggregate, status/transition vocabulary, product model and the
//! wire-level error vocabulary.

pub mod error;
pub mod models;
pub mod order;

// Re-exports
pub use error::{ErrorCode, ErrorDetail};
pub use models::Product;
pub use order::{LifecycleEvent, NewOrder, Order, OrderSource, OrderStatus};
pub use serde::{Deserialize, Serialize};
