// ============================================================================
// Settlement Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{OrderId, Side};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Read-only record of an executed order, as consumed by charting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settlement {
    /// Order that was executed
    pub order_id: OrderId,

    pub side: Side,

    /// Executed volume
    pub volume: Decimal,

    /// Execution price (the tick's close)
    pub price: Decimal,

    /// Timestamp of the tick the order settled on
    pub timestamp: DateTime<Utc>,

    /// Signed budget change: negative cost for buys, positive gain for sells
    pub cash_delta: Decimal,
}

impl Settlement {
    /// Calculate the notional value of the fill (price * volume), fee excluded
    pub fn notional_value(&self) -> Decimal {
        self.price * self.volume
    }

    /// Fee paid on this fill
    pub fn fee(&self) -> Decimal {
        (self.cash_delta.abs() - self.notional_value()).abs()
    }
}

/// Budget change of a fill: `-(v * p * (1 + fee))` for buys,
/// `v * p * (1 - fee)` for sells. `None` on decimal overflow.
pub fn cash_delta(side: Side, volume: Decimal, price: Decimal, fee_rate: Decimal) -> Option<Decimal> {
    let notional = volume.checked_mul(price)?;
    match side {
        Side::Buy => notional
            .checked_mul(Decimal::ONE.checked_add(fee_rate)?)
            .map(|cost| -cost),
        Side::Sell => notional.checked_mul(Decimal::ONE.checked_sub(fee_rate)?),
    }
}
