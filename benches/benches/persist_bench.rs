//! # Persistence Benchmarks
//!
//! Measures save/load of machines through the in-memory store.
//!
//! Run: `cargo bench --bench persist_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use linmach_core::prelude::*;

fn machine(n_inputs: usize, n_outputs: usize) -> LinearMachine {
    let mut m = LinearMachine::new(n_inputs, n_outputs).unwrap();
    m.set_activation(Activation::Tanh);
    m
}

/// Benchmark save into a memory store
fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");

    for &n in &[4usize, 64, 256] {
        let m = machine(n, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &m, |b, m| {
            b.iter(|| {
                let mut store = MemoryStore::new();
                m.save(&mut store).unwrap();
                black_box(store)
            })
        });
    }

    group.finish();
}

/// Benchmark load from a memory store
fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for &n in &[4usize, 64, 256] {
        let mut store = MemoryStore::new();
        machine(n, n).save(&mut store).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &store, |b, store| {
            b.iter(|| black_box(LinearMachine::load(store).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_save, bench_load);

criterion_main!(benches);
