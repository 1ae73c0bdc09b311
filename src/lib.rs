// ============================================================================
// Backtest Engine Library
// Tick-driven trading environment with order settlement and strategy hooks
// ============================================================================

//! # Backtest Engine
//!
//! A single-security simulated trading environment for backtesting.
//!
//! ## Features
//!
//! - **Market, limit and stop orders** with an explicit order state machine
//! - **Exact decimal settlement** so replays reproduce bit for bit
//! - **Synchronous event bus** feeding each tick's close to strategies
//! - **Structured diagnostics** through pluggable event handlers and `tracing`
//!
//! ## Example
//!
//! ```rust
//! use backtest_engine::prelude::*;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let config = EnvironmentConfig::frictionless("ETHUSD".to_string(), Decimal::from(1000));
//! let mut env = SimulationEnvironment::new(&config, Arc::new(NoOpEventHandler)).unwrap();
//!
//! // Buy one unit as soon as the close drops to 95 or below
//! env.account_mut().place_limit_buy(Decimal::ONE, Decimal::from(95));
//!
//! let quotes = [100, 90, 110].iter().enumerate().map(|(i, close)| {
//!     let close = Decimal::from(*close);
//!     Quote::from_unix(i as i64 * 3_600, "ETHUSD", close, close, close, close).unwrap()
//! });
//!
//! let report = env.run(quotes).unwrap();
//! assert_eq!(report.final_budget, Decimal::from(910));
//! assert_eq!(report.final_volume, Decimal::ONE);
//! ```

pub mod domain;
pub mod engine;
pub mod errors;
pub mod interfaces;
pub mod utils;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::order::state::{OrderStatus, OrderTransition};
    pub use crate::domain::{
        Account, EnvironmentConfig, Order, OrderBook, OrderId, OrderKind, PendingPolicy, Position,
        Quote, Settlement, Side, StopActivation,
    };
    pub use crate::engine::{
        create_from_config, CallbackId, EventBus, MatchingEngine, SimulationBuilder,
        SimulationEnvironment, SimulationReport, UPDATE_EVENT,
    };
    pub use crate::errors::{EnvironmentError, ExecutionError, OrderStateError};
    pub use crate::interfaces::{
        ChannelEventHandler, EventHandler, LoggingEventHandler, NoOpEventHandler, OrderEvent,
        RecordingEventHandler, Strategy,
    };
}
