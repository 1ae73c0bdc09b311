// ============================================================================
// Quote Domain Model
// ============================================================================

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One historical price sample.
///
/// Matching and strategies only look at `close` and `timestamp`; the other
/// prices travel along for charting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    pub security: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Quote {
    pub fn new(
        timestamp: DateTime<Utc>,
        security: impl Into<String>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> Self {
        Self {
            timestamp,
            security: security.into(),
            open,
            high,
            low,
            close,
        }
    }

    /// Build a quote from a Unix timestamp in seconds.
    ///
    /// Returns `None` when the timestamp is outside chrono's range.
    pub fn from_unix(
        unix_seconds: i64,
        security: impl Into<String>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
    ) -> Option<Self> {
        let timestamp = DateTime::from_timestamp(unix_seconds, 0)?;
        Some(Self::new(timestamp, security, open, high, low, close))
    }

    /// Flat bar where every price equals `close`
    pub fn flat(timestamp: DateTime<Utc>, security: impl Into<String>, close: Decimal) -> Self {
        Self::new(timestamp, security, close, close, close, close)
    }
}
