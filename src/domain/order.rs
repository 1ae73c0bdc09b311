// ============================================================================
// Order Domain Model
// ============================================================================

use crate::errors::OrderStateError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Value Objects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Buy,
    Sell,
}

/// Order type together with the prices that type requires.
///
/// A limit or stop order without a limit price cannot be expressed, and a
/// market order cannot carry one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderKind {
    /// Executes at the first tick with enough funds
    Market,
    /// Executes once the close crosses the limit price
    Limit { limit_price: Decimal },
    /// Activates when the close crosses the stop price, then behaves as a limit
    Stop {
        stop_price: Decimal,
        limit_price: Decimal,
    },
}

impl OrderKind {
    pub fn limit_price(&self) -> Option<Decimal> {
        match self {
            OrderKind::Market => None,
            OrderKind::Limit { limit_price } | OrderKind::Stop { limit_price, .. } => {
                Some(*limit_price)
            },
        }
    }

    pub fn stop_price(&self) -> Option<Decimal> {
        match self {
            OrderKind::Stop { stop_price, .. } => Some(*stop_price),
            _ => None,
        }
    }

    /// Status an order of this kind starts in
    pub fn initial_status(&self) -> state::OrderStatus {
        match self {
            OrderKind::Stop { .. } => state::OrderStatus::Open,
            OrderKind::Market | OrderKind::Limit { .. } => state::OrderStatus::Active,
        }
    }
}

// ============================================================================
// Order State Machine
// ============================================================================

pub mod state {
    use crate::errors::OrderStateError;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum OrderStatus {
        /// Stop order waiting for its stop price
        Open,
        /// Eligible for execution once the limit condition holds
        Active,
        /// Executed; immutable from here on
        Settled,
    }

    impl OrderStatus {
        pub fn is_terminal(&self) -> bool {
            matches!(self, OrderStatus::Settled)
        }
    }

    /// Valid state transitions for the order state machine
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum OrderTransition {
        Trigger,
        Settle,
    }

    impl OrderStatus {
        pub fn transition(&self, via: OrderTransition) -> Result<OrderStatus, OrderStateError> {
            match (self, via) {
                (OrderStatus::Open, OrderTransition::Trigger) => Ok(OrderStatus::Active),
                (OrderStatus::Active, OrderTransition::Settle) => Ok(OrderStatus::Settled),
                _ => Err(OrderStateError { from: *self, via }),
            }
        }
    }
}

use state::{OrderStatus, OrderTransition};

// ============================================================================
// Order Entity
// ============================================================================

/// One trading intent owned by an [`Account`](crate::domain::Account).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Order {
    pub id: OrderId,
    pub side: Side,
    pub volume: Decimal,
    pub kind: OrderKind,

    status: OrderStatus,
    /// Set when the last execution attempt was rejected for lack of funds
    pending: bool,
    /// Number of rejected execution attempts so far
    rejections: u32,
    settled_at: Option<DateTime<Utc>>,
    executed_price: Option<Decimal>,
}

impl Order {
    pub fn new(side: Side, volume: Decimal, kind: OrderKind) -> Self {
        Self {
            id: OrderId::new(),
            side,
            volume,
            kind,
            status: kind.initial_status(),
            pending: false,
            rejections: 0,
            settled_at: None,
            executed_price: None,
        }
    }

    pub fn market(side: Side, volume: Decimal) -> Self {
        Self::new(side, volume, OrderKind::Market)
    }

    pub fn limit(side: Side, volume: Decimal, limit_price: Decimal) -> Self {
        Self::new(side, volume, OrderKind::Limit { limit_price })
    }

    pub fn stop(side: Side, volume: Decimal, stop_price: Decimal, limit_price: Decimal) -> Self {
        Self::new(
            side,
            volume,
            OrderKind::Stop {
                stop_price,
                limit_price,
            },
        )
    }

    // ========================================================================
    // Getters
    // ========================================================================

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_settled(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn rejections(&self) -> u32 {
        self.rejections
    }

    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }

    pub fn executed_price(&self) -> Option<Decimal> {
        self.executed_price
    }

    pub fn limit_price(&self) -> Option<Decimal> {
        self.kind.limit_price()
    }

    pub fn stop_price(&self) -> Option<Decimal> {
        self.kind.stop_price()
    }

    // ========================================================================
    // Lifecycle (driven by the account during matching)
    // ========================================================================

    /// Move a stop order from `Open` to `Active`.
    pub(crate) fn trigger(&mut self) -> Result<(), OrderStateError> {
        self.status = self.status.transition(OrderTransition::Trigger)?;
        Ok(())
    }

    /// Record the fill and freeze the order.
    pub(crate) fn settle(
        &mut self,
        price: Decimal,
        timestamp: DateTime<Utc>,
    ) -> Result<(), OrderStateError> {
        self.status = self.status.transition(OrderTransition::Settle)?;
        self.pending = false;
        self.settled_at = Some(timestamp);
        self.executed_price = Some(price);
        Ok(())
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending = false;
    }

    /// Flag a rejected attempt. Returns the updated rejection count.
    pub(crate) fn mark_pending(&mut self) -> u32 {
        self.pending = true;
        self.rejections += 1;
        self.rejections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_creation() {
        let market = Order::market(Side::Buy, dec!(1));
        assert_eq!(market.status(), OrderStatus::Active);
        assert_eq!(market.limit_price(), None);
        assert_eq!(market.stop_price(), None);

        let limit = Order::limit(Side::Sell, dec!(2), dec!(105));
        assert_eq!(limit.status(), OrderStatus::Active);
        assert_eq!(limit.limit_price(), Some(dec!(105)));

        let stop = Order::stop(Side::Buy, dec!(1), dec!(100), dec!(102));
        assert_eq!(stop.status(), OrderStatus::Open);
        assert_eq!(stop.stop_price(), Some(dec!(100)));
        assert_eq!(stop.limit_price(), Some(dec!(102)));
        assert!(!stop.is_pending());
    }

    #[test]
    fn test_state_transitions() {
        assert_eq!(
            OrderStatus::Open.transition(OrderTransition::Trigger),
            Ok(OrderStatus::Active)
        );
        assert_eq!(
            OrderStatus::Active.transition(OrderTransition::Settle),
            Ok(OrderStatus::Settled)
        );
        assert!(OrderStatus::Open.transition(OrderTransition::Settle).is_err());
        assert!(OrderStatus::Active.transition(OrderTransition::Trigger).is_err());
        assert!(OrderStatus::Settled.transition(OrderTransition::Settle).is_err());
    }

    #[test]
    fn test_settle_freezes_order() {
        let mut order = Order::limit(Side::Buy, dec!(1), dec!(95));
        order.mark_pending();
        let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        order.settle(dec!(90), ts).unwrap();
        assert!(order.is_settled());
        assert!(!order.is_pending());
        assert_eq!(order.executed_price(), Some(dec!(90)));
        assert_eq!(order.settled_at(), Some(ts));
        assert!(order.settle(dec!(91), ts).is_err());
        assert_eq!(order.executed_price(), Some(dec!(90)));
    }

    #[test]
    fn test_stop_trigger_only_once() {
        let mut order = Order::stop(Side::Sell, dec!(1), dec!(90), dec!(88));
        order.trigger().unwrap();
        assert_eq!(order.status(), OrderStatus::Active);
        assert!(order.trigger().is_err());
    }

    #[test]
    fn test_rejection_counter() {
        let mut order = Order::market(Side::Sell, dec!(3));
        assert_eq!(order.mark_pending(), 1);
        order.clear_pending();
        assert!(!order.is_pending());
        assert_eq!(order.mark_pending(), 2);
        assert!(order.is_pending());
    }
}
