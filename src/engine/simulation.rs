// ============================================================================
// Simulation Environment
// Replays a quote sequence through strategies and the matching engine
// ============================================================================

use crate::domain::{Account, EnvironmentConfig, Quote, Settlement};
use crate::engine::event_bus::{CallbackId, EventBus, UPDATE_EVENT};
use crate::engine::MatchingEngine;
use crate::errors::EnvironmentError;
use crate::interfaces::{EventHandler, OrderEvent, Strategy};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of one simulation run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationReport {
    pub security: String,

    /// Number of quotes processed
    pub ticks: usize,

    pub initial_budget: Decimal,
    pub initial_volume: Decimal,
    pub final_budget: Decimal,
    pub final_volume: Decimal,

    /// Executions in the order they happened
    pub settlements: Vec<Settlement>,

    /// Execution attempts rejected for lack of budget or volume
    pub rejected_attempts: usize,

    pub first_timestamp: Option<DateTime<Utc>>,
    pub last_timestamp: Option<DateTime<Utc>>,

    /// Close of the last quote, used to mark the held volume
    pub last_close: Option<Decimal>,
}

impl SimulationReport {
    /// Budget plus held volume valued at `mark_price`
    pub fn equity_at(&self, mark_price: Decimal) -> Decimal {
        self.final_budget + self.final_volume * mark_price
    }

    /// Equity marked at the last close; falls back to the budget alone
    pub fn final_equity(&self) -> Decimal {
        match self.last_close {
            Some(close) => self.equity_at(close),
            None => self.final_budget,
        }
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Single-security backtesting environment.
///
/// Each call to [`run`](Self::run) consumes the environment's one replay;
/// to replay again, build a fresh environment.
pub struct SimulationEnvironment {
    account: Account,
    bus: EventBus,
    engine: MatchingEngine,
    event_handler: Arc<dyn EventHandler>,
    initial_budget: Decimal,
    initial_volume: Decimal,
    has_run: bool,
}

impl SimulationEnvironment {
    /// Create a new environment from a validated configuration
    pub fn new(
        config: &EnvironmentConfig,
        event_handler: Arc<dyn EventHandler>,
    ) -> Result<Self, EnvironmentError> {
        config.validate().map_err(EnvironmentError::InvalidConfig)?;

        Ok(Self {
            account: Account::from_config(config),
            bus: EventBus::new(),
            engine: MatchingEngine::from_config(config),
            event_handler,
            initial_budget: config.initial_budget,
            initial_volume: config.initial_volume,
            has_run: false,
        })
    }

    // ========================================================================
    // Subscription
    // ========================================================================

    pub fn bind<F>(&mut self, event: impl Into<String>, callback: F) -> CallbackId
    where
        F: FnMut(Decimal, &mut Account) + 'static,
    {
        self.bus.bind(event, callback)
    }

    /// Subscribe a strategy to price updates
    pub fn bind_strategy<S>(&mut self, strategy: Rc<RefCell<S>>) -> CallbackId
    where
        S: Strategy + 'static,
    {
        self.bus.bind_strategy(UPDATE_EVENT, strategy)
    }

    pub fn unbind(&mut self, event: &str, id: CallbackId) -> Result<(), EnvironmentError> {
        self.bus.unbind(event, id)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Mutable account access, e.g. to seed orders before the run
    pub fn account_mut(&mut self) -> &mut Account {
        &mut self.account
    }

    pub fn engine(&self) -> &MatchingEngine {
        &self.engine
    }

    pub fn has_run(&self) -> bool {
        self.has_run
    }

    // ========================================================================
    // Simulation Loop
    // ========================================================================

    /// Replay `quotes` in the given order.
    ///
    /// Per quote: update callbacks run in registration order, then every live
    /// order is evaluated against the close. Input ordering is trusted.
    pub fn run<I>(&mut self, quotes: I) -> Result<SimulationReport, EnvironmentError>
    where
        I: IntoIterator<Item = Quote>,
    {
        if self.has_run {
            return Err(EnvironmentError::AlreadyRun);
        }
        self.has_run = true;

        let span = tracing::info_span!("simulation", security = %self.account.security());
        let _guard = span.enter();
        tracing::info!(
            budget = %self.account.budget(),
            volume = %self.account.held_volume(),
            "simulation started"
        );

        let mut ticks = 0;
        let mut rejected_attempts = 0;
        let mut first_timestamp = None;
        let mut last_timestamp = None;
        let mut last_close = None;

        for quote in quotes {
            let events = self.process_quote(&quote);
            rejected_attempts += events
                .iter()
                .filter(|event| matches!(event, OrderEvent::OrderPending { .. }))
                .count();

            if !events.is_empty() {
                self.event_handler.on_events(events);
            }

            ticks += 1;
            if first_timestamp.is_none() {
                first_timestamp = Some(quote.timestamp);
            }
            last_timestamp = Some(quote.timestamp);
            last_close = Some(quote.close);
        }

        // Placements with no tick left to carry them
        let leftover = self.account.drain_events();
        if !leftover.is_empty() {
            self.event_handler.on_events(leftover);
        }

        let report = SimulationReport {
            security: self.account.security().to_string(),
            ticks,
            initial_budget: self.initial_budget,
            initial_volume: self.initial_volume,
            final_budget: self.account.budget(),
            final_volume: self.account.held_volume(),
            settlements: self.account.settlements().to_vec(),
            rejected_attempts,
            first_timestamp,
            last_timestamp,
            last_close,
        };

        tracing::info!(
            ticks,
            settled = report.settlements.len(),
            rejected_attempts,
            budget = %report.final_budget,
            volume = %report.final_volume,
            "simulation finished"
        );

        Ok(report)
    }

    fn process_quote(&mut self, quote: &Quote) -> Vec<OrderEvent> {
        self.account.set_clock(quote.timestamp);

        self.bus.publish(UPDATE_EVENT, quote.close, &mut self.account);

        self.engine.process_tick(&mut self.account, quote)
    }
}

impl std::fmt::Debug for SimulationEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationEnvironment")
            .field("account", &self.account)
            .field("bus", &self.bus)
            .field("engine", &self.engine)
            .field("has_run", &self.has_run)
            .finish()
    }
}
