// ============================================================================
// Matching Engine
// Evaluates every live order against one quote and settles eligible ones
// ============================================================================

use crate::domain::{
    Account, EnvironmentConfig, OrderId, OrderKind, OrderStatus, PendingPolicy, Quote, Side,
    StopActivation,
};
use crate::errors::ExecutionError;
use crate::interfaces::OrderEvent;
use rust_decimal::Decimal;

/// Tick-driven matching engine.
///
/// Holds only policy; all state lives in the [`Account`] handed to
/// [`process_tick`](Self::process_tick) for the duration of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchingEngine {
    stop_activation: StopActivation,
    pending_policy: PendingPolicy,
}

impl MatchingEngine {
    /// Create a new matching engine
    pub fn new(stop_activation: StopActivation, pending_policy: PendingPolicy) -> Self {
        Self {
            stop_activation,
            pending_policy,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(config.stop_activation, config.pending_policy)
    }

    pub fn stop_activation(&self) -> StopActivation {
        self.stop_activation
    }

    pub fn pending_policy(&self) -> PendingPolicy {
        self.pending_policy
    }

    /// Evaluate every non-settled order against `quote`, in placement order.
    ///
    /// Execution happens at `quote.close`. Rejected executions never abort
    /// the tick; they come back as `OrderPending` events. Placements and
    /// cancellations journaled on the account since the last tick lead the
    /// returned events.
    pub fn process_tick(&self, account: &mut Account, quote: &Quote) -> Vec<OrderEvent> {
        let mut events = account.drain_events();

        for order_id in account.orders().live_ids() {
            self.evaluate(account, order_id, quote, &mut events);
        }

        events
    }

    // ========================================================================
    // Private methods
    // ========================================================================

    fn evaluate(
        &self,
        account: &mut Account,
        order_id: OrderId,
        quote: &Quote,
        events: &mut Vec<OrderEvent>,
    ) {
        let price = quote.close;
        let Some(order) = account.orders_mut().get_mut(&order_id) else {
            return;
        };
        if order.is_settled() {
            return;
        }
        order.clear_pending();

        let side = order.side;
        let eligible = match order.kind {
            OrderKind::Market => true,
            OrderKind::Limit { limit_price } => limit_reached(side, price, limit_price),
            OrderKind::Stop {
                stop_price,
                limit_price,
            } => {
                if order.status() == OrderStatus::Open {
                    if !stop_reached(side, price, stop_price) {
                        return;
                    }
                    if let Err(err) = order.trigger() {
                        tracing::error!(%order_id, %err, "stop order could not be triggered");
                        return;
                    }

                    tracing::debug!(%order_id, %price, %stop_price, "stop order triggered");
                    events.push(OrderEvent::StopTriggered {
                        order_id,
                        price,
                        timestamp: quote.timestamp,
                    });

                    if self.stop_activation == StopActivation::NextTick {
                        return;
                    }
                }
                limit_reached(side, price, limit_price)
            },
        };

        if !eligible {
            return;
        }

        match account.execute(order_id, price, quote.timestamp) {
            Ok(settlement) => {
                tracing::debug!(
                    %order_id,
                    side = ?settlement.side,
                    volume = %settlement.volume,
                    %price,
                    "order settled"
                );
                events.push(OrderEvent::OrderSettled { settlement });
            },
            Err(reason) if reason.is_retryable() => {
                self.reject(account, order_id, reason, quote, events);
            },
            Err(err) => {
                tracing::error!(%order_id, %err, "order skipped");
            },
        }
    }

    fn reject(
        &self,
        account: &mut Account,
        order_id: OrderId,
        reason: ExecutionError,
        quote: &Quote,
        events: &mut Vec<OrderEvent>,
    ) {
        let Some(order) = account.orders_mut().get_mut(&order_id) else {
            return;
        };
        let rejections = order.mark_pending();

        tracing::warn!(%order_id, rejections, "{}", reason);
        events.push(OrderEvent::OrderPending {
            order_id,
            reason,
            timestamp: quote.timestamp,
        });

        if self.pending_policy.should_expire(rejections) {
            account.orders_mut().remove(&order_id);
            tracing::warn!(%order_id, rejections, "pending order expired");
            events.push(OrderEvent::OrderExpired {
                order_id,
                rejections,
                timestamp: quote.timestamp,
            });
        }
    }
}

/// Limit condition: buys at or below the limit, sells at or above it
fn limit_reached(side: Side, close: Decimal, limit_price: Decimal) -> bool {
    match side {
        Side::Buy => close <= limit_price,
        Side::Sell => close >= limit_price,
    }
}

/// Stop condition: buy stops fire on a rise to the stop, sell stops on a fall
fn stop_reached(side: Side, close: Decimal, stop_price: Decimal) -> bool {
    match side {
        Side::Buy => close >= stop_price,
        Side::Sell => close <= stop_price,
    }
}
