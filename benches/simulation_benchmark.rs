// ============================================================================
// Simulation Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Tick Evaluation - One matching pass over a book of resting orders
// 2. Full Replay - Quotes driven through callbacks and matching end to end
// 3. Order Book Operations - Placement and cancellation
// ============================================================================

use backtest_engine::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;
use std::sync::Arc;

fn quote(tick: i64, close: Decimal) -> Quote {
    Quote::from_unix(tick * 60, "BENCH", close, close, close, close).unwrap()
}

/// Resting limit buys spaced one unit apart below `base`
fn resting_account(orders: i64, base: i64) -> Account {
    let mut account = Account::new("BENCH", Decimal::from(1_000_000), Decimal::ZERO, Decimal::ZERO);
    for i in 0..orders {
        account.place_limit_buy(Decimal::ONE, Decimal::from(base - 1 - i));
    }
    account
}

// ============================================================================
// Tick Evaluation
// ============================================================================

fn benchmark_process_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_tick");
    let engine = MatchingEngine::default();

    for num_orders in [10, 100, 1000].iter() {
        // Close sits above every limit: nothing settles, every order is checked
        group.bench_with_input(
            BenchmarkId::new("no_match", num_orders),
            num_orders,
            |b, &num_orders| {
                let mut account = resting_account(num_orders, 10_000);
                let q = quote(1, Decimal::from(10_000));
                b.iter(|| black_box(engine.process_tick(&mut account, &q)));
            },
        );

        // Close sits below every limit: the whole book settles once
        group.bench_with_input(
            BenchmarkId::new("full_match", num_orders),
            num_orders,
            |b, &num_orders| {
                b.iter_batched(
                    || resting_account(num_orders, 10_000),
                    |mut account| {
                        let q = quote(1, Decimal::from(1));
                        black_box(engine.process_tick(&mut account, &q));
                        account
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

// ============================================================================
// Full Replay
// ============================================================================

struct MeanReversion {
    last: Option<Decimal>,
}

impl Strategy for MeanReversion {
    fn update(&mut self, price: Decimal, account: &mut Account) {
        if let Some(last) = self.last {
            if price < last {
                account.place_limit_buy(Decimal::ONE, price);
            } else if price > last && account.held_volume() >= Decimal::ONE {
                account.place_market_sell(Decimal::ONE);
            }
        }
        self.last = Some(price);
    }
}

fn benchmark_full_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_replay");

    for num_ticks in [100i64, 1_000, 10_000].iter() {
        let quotes: Vec<Quote> = (0..*num_ticks)
            .map(|t| quote(t, Decimal::from(1_000 + (t * 37) % 50)))
            .collect();

        group.bench_with_input(BenchmarkId::new("mean_reversion", num_ticks), &quotes, |b, quotes| {
            b.iter_batched(
                || {
                    let mut env = SimulationBuilder::new("BENCH")
                        .with_budget(Decimal::from(100_000))
                        .with_fee_rate(Decimal::new(1, 3))
                        .build(Arc::new(NoOpEventHandler))
                        .unwrap();
                    env.bind_strategy(Rc::new(RefCell::new(MeanReversion { last: None })));
                    env
                },
                |mut env| black_box(env.run(quotes.iter().cloned()).unwrap()),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

// ============================================================================
// Order Book Operations
// ============================================================================

fn benchmark_place_and_cancel(c: &mut Criterion) {
    c.bench_function("place_and_cancel_1000", |b| {
        b.iter(|| {
            let mut account = resting_account(1000, 10_000);
            let ids = account.orders().live_ids();
            for id in ids {
                black_box(account.cancel(id).unwrap());
            }
            account
        });
    });
}

criterion_group!(
    benches,
    benchmark_process_tick,
    benchmark_full_replay,
    benchmark_place_and_cancel
);
criterion_main!(benches);
