// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod account;
pub mod config;
pub mod order;
pub mod order_book;
pub mod position;
pub mod quote;
pub mod settlement;

pub use account::Account;
pub use config::{EnvironmentConfig, PendingPolicy, StopActivation};
pub use order::{Order, OrderId, OrderKind, Side};
pub use order_book::OrderBook;
pub use position::Position;
pub use quote::Quote;
pub use settlement::Settlement;

// Re-export state machine
pub use order::state::{OrderStatus, OrderTransition};
