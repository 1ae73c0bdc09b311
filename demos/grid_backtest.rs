// ============================================================================
// Grid Backtest Example
// ============================================================================

use backtest_engine::prelude::*;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Buys one unit each time the close falls a grid step below the last fill
/// and protects each fill with a stop sell one step lower.
struct GridStrategy {
    step: Decimal,
    anchor: Option<Decimal>,
    fills: usize,
}

impl GridStrategy {
    fn new(step: Decimal) -> Self {
        Self {
            step,
            anchor: None,
            fills: 0,
        }
    }
}

impl Strategy for GridStrategy {
    fn update(&mut self, price: Decimal, account: &mut Account) {
        let Some(anchor) = self.anchor else {
            self.anchor = Some(price);
            return;
        };

        if price <= anchor - self.step {
            account.place_market_buy(Decimal::ONE);
            account.place_stop_sell(Decimal::ONE, price - self.step, price - self.step * Decimal::TWO);
            self.anchor = Some(price);
            self.fills += 1;
        } else if price >= anchor + self.step && account.held_volume() >= Decimal::ONE {
            account.place_limit_sell(Decimal::ONE, price);
            self.anchor = Some(price);
        }
    }
}

/// Deterministic saw-tooth price path
fn synthetic_quotes(ticks: i64) -> Vec<Quote> {
    (0..ticks)
        .filter_map(|t| {
            let wave = (t * 7) % 40 - 20;
            let drift = t / 10;
            let close = Decimal::from(2_000 + wave + drift);
            let open = close - Decimal::ONE;
            Quote::from_unix(
                1_700_000_000 + t * 3_600,
                "ETHUSD",
                open,
                close + Decimal::TWO,
                open - Decimal::TWO,
                close,
            )
        })
        .collect()
}

fn main() {
    #[cfg(feature = "logging")]
    backtest_engine::utils::init_logging();

    println!("=== Grid Backtest Example ===\n");

    let mut env = match SimulationBuilder::new("ETHUSD")
        .with_budget(Decimal::from(20_000))
        .with_fee_rate(Decimal::new(1, 3))
        .expire_pending_after(5)
        .build(Arc::new(LoggingEventHandler))
    {
        Ok(env) => env,
        Err(err) => {
            eprintln!("invalid configuration: {}", err);
            return;
        },
    };

    let strategy = Rc::new(RefCell::new(GridStrategy::new(Decimal::from(10))));
    env.bind_strategy(Rc::clone(&strategy));

    let quotes = synthetic_quotes(500);
    let report = match env.run(quotes) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("simulation failed: {}", err);
            return;
        },
    };

    println!("Security:          {}", report.security);
    println!("Ticks:             {}", report.ticks);
    println!("Grid entries:      {}", strategy.borrow().fills);
    println!("Settled orders:    {}", report.settlements.len());
    println!("Rejected attempts: {}", report.rejected_attempts);
    println!("Final budget:      {}", report.final_budget);
    println!("Final volume:      {}", report.final_volume);
    println!("Final equity:      {}", report.final_equity());

    println!("\nLast settlements:");
    for settlement in report.settlements.iter().rev().take(5) {
        println!(
            "  {} {:?} {} @ {} ({})",
            settlement.timestamp.format("%Y-%m-%d %H:%M"),
            settlement.side,
            settlement.volume,
            settlement.price,
            settlement.cash_delta
        );
    }

    #[cfg(feature = "serde")]
    match report.to_json() {
        Ok(json) => println!("\n{} bytes of JSON report", json.len()),
        Err(err) => eprintln!("report serialization failed: {}", err),
    }
}
