// ============================================================================
// Error Types
// Structural errors surface to the caller, economic errors become warnings
// ============================================================================

use crate::domain::order::state::{OrderStatus, OrderTransition};
use crate::domain::OrderId;
use crate::engine::CallbackId;
use rust_decimal::Decimal;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors returned to strategies and to whoever drives the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    #[error("order {0} does not exist")]
    UnknownOrder(OrderId),

    #[error("callback {callback} is not bound to event '{event}'")]
    CallbackNotFound { event: String, callback: CallbackId },

    #[error("invalid environment configuration: {0}")]
    InvalidConfig(String),

    #[error("simulation has already run; construct a fresh environment to replay")]
    AlreadyRun,
}

/// Invalid move through the order state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[error("invalid order transition from {from:?} via {via:?}")]
pub struct OrderStateError {
    pub from: OrderStatus,
    pub via: OrderTransition,
}

/// Failure of a single execution attempt during matching.
///
/// `InsufficientBudget`, `InsufficientVolume` and `Overflow` are retryable:
/// the order is left pending and evaluated again on the next tick. The
/// remaining variants mean the engine was handed an order it must not execute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExecutionError {
    #[error("not enough budget for order {order_id}: required {required}, available {available}")]
    InsufficientBudget {
        order_id: OrderId,
        required: Decimal,
        available: Decimal,
    },

    #[error("not enough volume for order {order_id}: required {required}, held {available}")]
    InsufficientVolume {
        order_id: OrderId,
        required: Decimal,
        available: Decimal,
    },

    #[error("decimal overflow while executing order {order_id}")]
    Overflow { order_id: OrderId },

    #[error("order {0} is not in the book")]
    UnknownOrder(OrderId),

    #[error(transparent)]
    InvalidState(#[from] OrderStateError),
}

impl ExecutionError {
    /// Whether the order should stay in the book and be retried next tick.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExecutionError::InsufficientBudget { .. }
                | ExecutionError::InsufficientVolume { .. }
                | ExecutionError::Overflow { .. }
        )
    }
}
