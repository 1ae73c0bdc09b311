// ============================================================================
// Event Handler Interface
// Defines the contract for observing order lifecycle events
// ============================================================================

use crate::domain::{OrderId, OrderKind, Settlement, Side};
use crate::errors::ExecutionError;
use chrono::{DateTime, Utc};
use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted while a simulation runs.
///
/// Timestamps are simulated time (the quote being processed), never wall
/// clock time. Placement and cancellation outside a run carry `None`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrderEvent {
    /// Order accepted into the account's book
    OrderPlaced {
        order_id: OrderId,
        side: Side,
        kind: OrderKind,
        volume: Decimal,
        timestamp: Option<DateTime<Utc>>,
    },

    /// Order removed by its owner
    OrderCancelled {
        order_id: OrderId,
        timestamp: Option<DateTime<Utc>>,
    },

    /// Stop order crossed its stop price and became active
    StopTriggered {
        order_id: OrderId,
        price: Decimal,
        timestamp: DateTime<Utc>,
    },

    /// Order executed; budget and volume updated
    OrderSettled { settlement: Settlement },

    /// Execution was due but funds were insufficient; retried next tick
    OrderPending {
        order_id: OrderId,
        reason: ExecutionError,
        timestamp: DateTime<Utc>,
    },

    /// Order dropped after too many rejected attempts
    OrderExpired {
        order_id: OrderId,
        rejections: u32,
        timestamp: DateTime<Utc>,
    },
}

impl OrderEvent {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::OrderPlaced { order_id, .. }
            | OrderEvent::OrderCancelled { order_id, .. }
            | OrderEvent::StopTriggered { order_id, .. }
            | OrderEvent::OrderPending { order_id, .. }
            | OrderEvent::OrderExpired { order_id, .. } => *order_id,
            OrderEvent::OrderSettled { settlement } => settlement.order_id,
        }
    }

    /// Whether this event reports a rejected execution attempt
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            OrderEvent::OrderPending { .. } | OrderEvent::OrderExpired { .. }
        )
    }
}

/// Event handler trait for processing simulation events
/// Implementations can handle logging, metrics, charting, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an order event
    fn on_event(&self, event: OrderEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<OrderEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: OrderEvent) {
        // Do nothing
    }
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        if event.is_warning() {
            tracing::warn!("Simulation event: {:?}", event);
        } else {
            tracing::debug!("Simulation event: {:?}", event);
        }
    }
}

/// Keeps every event in memory for later inspection
#[derive(Default)]
pub struct RecordingEventHandler {
    events: Mutex<Vec<OrderEvent>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<OrderEvent> {
        self.events.lock().clone()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<OrderEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventHandler for RecordingEventHandler {
    fn on_event(&self, event: OrderEvent) {
        self.events.lock().push(event);
    }

    fn on_events(&self, events: Vec<OrderEvent>) {
        self.events.lock().extend(events);
    }
}

/// Forwards events over a crossbeam channel
pub struct ChannelEventHandler {
    sender: Sender<OrderEvent>,
}

impl ChannelEventHandler {
    pub fn new(sender: Sender<OrderEvent>) -> Self {
        Self { sender }
    }

    /// Handler paired with the receiving end of an unbounded channel
    pub fn unbounded() -> (Self, Receiver<OrderEvent>) {
        let (sender, receiver) = channel::unbounded();
        (Self::new(sender), receiver)
    }
}

impl EventHandler for ChannelEventHandler {
    fn on_event(&self, event: OrderEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("event receiver dropped, discarding event");
        }
    }
}
