//! Simulation benchmarks for fleet_core.
//!
//! Run with: `cargo bench -p fleet_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use fleet_test_utils::fixtures::busy_fleet;

/// Ticks a busy fleet and hashes its state.
pub fn simulation_benchmark(c: &mut Criterion) {
    for size in [10, 100] {
        c.bench_function(&format!("tick_busy_fleet_{size}"), |b| {
            b.iter_batched(
                || busy_fleet(size),
                |mut sim| {
                    for _ in 0..50 {
                        black_box(sim.tick());
                    }
                    sim
                },
                BatchSize::SmallInput,
            );
        });
    }

    let sim = busy_fleet(100);
    c.bench_function("state_hash_100", |b| b.iter(|| black_box(sim.state_hash())));
    c.bench_function("snapshot_100", |b| b.iter(|| black_box(sim.snapshot())));
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
