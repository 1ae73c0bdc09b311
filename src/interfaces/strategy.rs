// ============================================================================
// Strategy Interface
// The narrow surface a trading strategy sees during a simulation
// ============================================================================

use crate::domain::Account;
use rust_decimal::Decimal;

/// A trading strategy driven by price updates.
///
/// `update` runs once per tick with the tick's closing price, before any
/// order is evaluated against that tick. Orders placed here are evaluated on
/// the same tick; orders cancelled here are not.
pub trait Strategy {
    fn update(&mut self, price: Decimal, account: &mut Account);
}

impl<F> Strategy for F
where
    F: FnMut(Decimal, &mut Account),
{
    fn update(&mut self, price: Decimal, account: &mut Account) {
        self(price, account)
    }
}
