//! Order domain types
//!
//! - **types**: status enum, lifecycle events and the transition table
//! - **snapshot**: the unified `Order` aggregate

pub mod snapshot;
pub mod types;

pub use snapshot::{NewOrder, Order};
pub use types::{LifecycleEvent, OrderSource, OrderStatus};
