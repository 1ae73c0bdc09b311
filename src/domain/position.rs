// ============================================================================
// Position Domain Model
// ============================================================================

use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Open position in a security.
///
/// Accounts expose a positions map so strategies can already code against
/// it, but the simulated account tracks holdings as a single volume and never
/// fills this map.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub position_id: String,
    pub security: String,
    pub volume: Decimal,
    pub price: Decimal,
}
