//! cubedh Criterion Benchmark: Generation & Action
//!
//! Cost of seed expansion and of one group action across tensor sizes.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cubedh::{act, generate_matrix_tuple, generate_tensor, Params, Side};
use rand::prelude::*;
use std::hint::black_box;

/// (d, n, kappa, label)
const SHAPES: [(usize, usize, u32, &str); 5] = [
    (4, 2, 16, "d4-n2-k16"),
    (4, 3, 32, "d4-n3-k32"),
    (4, 8, 32, "d4-n8-k32"),
    (6, 4, 64, "d6-n4-k64"),
    (8, 3, 64, "d8-n3-k64"),
];

// =============================================================================
// BENCHMARK 1: GENERATION
// =============================================================================

/// SHAKE256 expansion of a seed into the public tensor.
fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("1-Generate");

    for (d, n, kappa, name) in SHAPES {
        let params = Params::new(d, n, kappa).unwrap();
        let mut seed = [0u8; 32];
        rand::rng().fill(&mut seed[..]);
        group.throughput(Throughput::Elements(params.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(name), &seed, |b, seed| {
            b.iter(|| generate_tensor(black_box(seed), &params))
        });
    }
    group.finish();
}

// =============================================================================
// BENCHMARK 2: ACTION
// =============================================================================

/// One action on each half.
fn bench_act(c: &mut Criterion) {
    let mut group = c.benchmark_group("2-Act");

    for (d, n, kappa, name) in SHAPES {
        let params = Params::new(d, n, kappa).unwrap();
        let mut seed = [0u8; 32];
        rand::rng().fill(&mut seed[..]);
        let t = generate_tensor(&seed, &params);
        let m = generate_matrix_tuple(&seed[..16], &params);
        group.throughput(Throughput::Elements(params.len() as u64));

        for side in [Side::First, Side::Second] {
            let id = BenchmarkId::new(format!("{side:?}"), name);
            group.bench_with_input(id, &t, |b, t| {
                b.iter(|| act(black_box(t), &m, side).unwrap())
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_act);
criterion_main!(benches);
