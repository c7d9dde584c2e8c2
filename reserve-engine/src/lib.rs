//! Order lifecycle and inventory reservation engine
//!
//! Library-level core behind a warehouse/storefront application:
//!
//! - **lifecycle**: the reservation state machine ([`OrderEngine`])
//! - **stock**: derived available-stock computation
//! - **codes**: collision-checked human-short order codes
//! - **tokens**: opaque anonymous-lookup tokens (QR)
//! - **sweeper**: periodic expiry of stale reservations
//! - **store**: persistence boundary trait plus an in-memory reference store
//!
//! # Control Flow
//!
//! ```text
//! caller ──> OrderEngine ──> transition table (shared::OrderStatus::next)
//!                │                │
//!                │           stock ledger check (reserve only)
//!                │                │
//!                └──> ReservationStore conditional write (version CAS)
//!
//! ExpirySweeper ──(interval)──> OrderEngine::sweep_expired ──> same path
//! ```
//!
//! All writers go through [`OrderEngine::transition`]; the sweeper drives
//! the same entry point, so stock-releasing logic exists exactly once.

pub mod clock;
pub mod codes;
pub mod config;
pub mod lifecycle;
pub mod stock;
pub mod store;
pub mod sweeper;
pub mod tokens;

// Re-exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use codes::OrderCodeGenerator;
pub use config::EngineConfig;
pub use lifecycle::{EngineError, EngineResult, OrderEngine};
pub use store::{MemoryStore, ReservationStore, StockGuard, StoreError};
pub use sweeper::ExpirySweeper;
pub use tokens::{TokenRenderer, TokenService};

// Re-export shared types for convenience
pub use shared::{LifecycleEvent, NewOrder, Order, OrderSource, OrderStatus, Product};
