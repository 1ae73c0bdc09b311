// ============================================================================
// Account State
// Budget, held volume and the order book of one security
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::settlement::cash_delta;
use super::order::state::OrderTransition;
use super::{EnvironmentConfig, Order, OrderBook, OrderId, Position, Settlement, Side};
use crate::errors::{EnvironmentError, ExecutionError};
use crate::interfaces::OrderEvent;

/// Simulated trading account for a single security.
///
/// Strategies place and cancel orders here; the matching engine settles them.
/// Budget and volume only change through a successful execution.
#[derive(Debug, Clone)]
pub struct Account {
    security: String,
    budget: Decimal,
    volume: Decimal,
    fee_rate: Decimal,
    orders: OrderBook,
    positions: HashMap<String, Position>,

    /// Timestamp of the tick being processed, `None` before the first tick
    clock: Option<DateTime<Utc>>,

    /// Executions in the order they happened; cancellation never touches it
    ledger: Vec<Settlement>,

    /// Placement and cancellation events not yet forwarded
    journal: Vec<OrderEvent>,
}

impl Account {
    pub fn new(
        security: impl Into<String>,
        budget: Decimal,
        volume: Decimal,
        fee_rate: Decimal,
    ) -> Self {
        Self {
            security: security.into(),
            budget,
            volume,
            fee_rate,
            orders: OrderBook::new(),
            positions: HashMap::new(),
            clock: None,
            ledger: Vec::new(),
            journal: Vec::new(),
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(
            config.security.clone(),
            config.initial_budget,
            config.initial_volume,
            config.fee_rate,
        )
    }

    // ========================================================================
    // Order Placement
    // ========================================================================

    pub fn place_market(&mut self, side: Side, volume: Decimal) -> OrderId {
        self.place(Order::market(side, volume))
    }

    pub fn place_limit(&mut self, side: Side, volume: Decimal, limit_price: Decimal) -> OrderId {
        self.place(Order::limit(side, volume, limit_price))
    }

    pub fn place_stop(
        &mut self,
        side: Side,
        volume: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> OrderId {
        self.place(Order::stop(side, volume, stop_price, limit_price))
    }

    pub fn place_market_buy(&mut self, volume: Decimal) -> OrderId {
        self.place_market(Side::Buy, volume)
    }

    pub fn place_market_sell(&mut self, volume: Decimal) -> OrderId {
        self.place_market(Side::Sell, volume)
    }

    pub fn place_limit_buy(&mut self, volume: Decimal, limit_price: Decimal) -> OrderId {
        self.place_limit(Side::Buy, volume, limit_price)
    }

    pub fn place_limit_sell(&mut self, volume: Decimal, limit_price: Decimal) -> OrderId {
        self.place_limit(Side::Sell, volume, limit_price)
    }

    pub fn place_stop_buy(
        &mut self,
        volume: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> OrderId {
        self.place_stop(Side::Buy, volume, stop_price, limit_price)
    }

    pub fn place_stop_sell(
        &mut self,
        volume: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> OrderId {
        self.place_stop(Side::Sell, volume, stop_price, limit_price)
    }

    /// Remove an order from the book, whatever its status.
    ///
    /// A settled order keeps its entry in [`settlements`](Self::settlements).
    pub fn cancel(&mut self, order_id: OrderId) -> Result<Order, EnvironmentError> {
        let order = self
            .orders
            .remove(&order_id)
            .ok_or(EnvironmentError::UnknownOrder(order_id))?;

        tracing::debug!(%order_id, status = ?order.status(), "order cancelled");
        self.journal.push(OrderEvent::OrderCancelled {
            order_id,
            timestamp: self.clock,
        });
        Ok(order)
    }

    fn place(&mut self, order: Order) -> OrderId {
        let side = order.side;
        let volume = order.volume;
        let kind = order.kind;
        let order_id = self.orders.insert(order);

        tracing::debug!(%order_id, ?side, %volume, ?kind, "order placed");
        self.journal.push(OrderEvent::OrderPlaced {
            order_id,
            side,
            kind,
            volume,
            timestamp: self.clock,
        });
        order_id
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn security(&self) -> &str {
        &self.security
    }

    pub fn budget(&self) -> Decimal {
        self.budget
    }

    pub fn held_volume(&self) -> Decimal {
        self.volume
    }

    pub fn fee_rate(&self) -> Decimal {
        self.fee_rate
    }

    /// The live order book, including settled orders
    pub fn orders(&self) -> &OrderBook {
        &self.orders
    }

    pub fn order(&self, order_id: &OrderId) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Always empty: holdings are tracked as a single volume
    pub fn positions(&self) -> &HashMap<String, Position> {
        &self.positions
    }

    /// Every execution so far, in execution order
    pub fn settlements(&self) -> &[Settlement] {
        &self.ledger
    }

    /// Timestamp of the tick currently being processed
    pub fn clock(&self) -> Option<DateTime<Utc>> {
        self.clock
    }

    // ========================================================================
    // Matching Support
    // ========================================================================

    pub(crate) fn set_clock(&mut self, timestamp: DateTime<Utc>) {
        self.clock = Some(timestamp);
    }

    pub(crate) fn orders_mut(&mut self) -> &mut OrderBook {
        &mut self.orders
    }

    /// Take the placement and cancellation events recorded since the last drain.
    ///
    /// [`MatchingEngine::process_tick`](crate::engine::MatchingEngine::process_tick)
    /// drains them at the start of every tick.
    pub fn drain_events(&mut self) -> Vec<OrderEvent> {
        std::mem::take(&mut self.journal)
    }

    /// Execute an order at `price`, settling it on success.
    ///
    /// Buys cost `volume * price * (1 + fee)` and are rejected only when that
    /// exceeds the budget. Sells yield `volume * price * (1 - fee)` and are
    /// rejected only when the order volume exceeds the held volume. A rejected
    /// attempt, including one that would overflow, leaves budget, volume and
    /// the order untouched.
    pub(crate) fn execute(
        &mut self,
        order_id: OrderId,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<Settlement, ExecutionError> {
        let overflow = || ExecutionError::Overflow { order_id };
        let order = self
            .orders
            .get_mut(&order_id)
            .ok_or(ExecutionError::UnknownOrder(order_id))?;

        // Reject settled orders before any funds move
        order.status().transition(OrderTransition::Settle)?;

        let delta = cash_delta(order.side, order.volume, price, self.fee_rate).ok_or_else(overflow)?;
        let volume = match order.side {
            Side::Buy => {
                let cost = -delta;
                if cost > self.budget {
                    return Err(ExecutionError::InsufficientBudget {
                        order_id,
                        required: cost,
                        available: self.budget,
                    });
                }
                self.volume.checked_add(order.volume)
            },
            Side::Sell => {
                if order.volume > self.volume {
                    return Err(ExecutionError::InsufficientVolume {
                        order_id,
                        required: order.volume,
                        available: self.volume,
                    });
                }
                self.volume.checked_sub(order.volume)
            },
        }
        .ok_or_else(overflow)?;
        let budget = self.budget.checked_add(delta).ok_or_else(overflow)?;

        order.settle(price, timestamp)?;
        self.volume = volume;
        self.budget = budget;

        let settlement = Settlement {
            order_id,
            side: order.side,
            volume: order.volume,
            price,
            timestamp,
            cash_delta: delta,
        };
        self.ledger.push(settlement.clone());
        Ok(settlement)
    }
}
