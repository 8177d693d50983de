//! cubedh Criterion Benchmark: Full Exchange
//!
//! End-to-end cost of one exchange, including OS entropy and both paths.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cubedh::{replay_exchange, run_exchange, ExchangeConfig, OsEntropy, Params, Seeds};
use std::hint::black_box;

// =============================================================================
// BENCHMARK 1: FRESH EXCHANGE
// =============================================================================

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("1-Exchange");

    for (name, params) in [("reference", Params::REFERENCE), ("wide", Params::WIDE)] {
        let config = ExchangeConfig::new(params);
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| run_exchange(black_box(config), &mut OsEntropy).unwrap())
        });
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 2: REPLAY
// =============================================================================

/// Deterministic replay: no entropy, same work as a fresh run.
fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("2-Replay");
    let params = Params::new(6, 3, 32).unwrap();
    let seeds = Seeds {
        tensor: vec![1u8; 32],
        secret_a: vec![2u8; 16],
        secret_b: vec![3u8; 16],
    };

    group.bench_function("d6-n3-k32", |b| {
        b.iter(|| replay_exchange(params, black_box(seeds.clone())).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_run, bench_replay);
criterion_main!(benches);
