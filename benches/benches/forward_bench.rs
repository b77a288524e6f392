//! # Forward Benchmarks
//!
//! Measures single-row and batch evaluation of linear machines across sizes.
//!
//! Run: `cargo bench --bench forward_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use linmach_core::prelude::*;

/// Deterministic, non-trivial parameters
fn machine(n_inputs: usize, n_outputs: usize, activation: Activation) -> LinearMachine {
    let weights: Vec<f64> = (0..n_inputs * n_outputs)
        .map(|k| ((k * 37 % 101) as f64 - 50.0) / 100.0)
        .collect();
    let weights = Matrix::from_shape_vec(n_inputs, n_outputs, weights).unwrap();
    let mut m = LinearMachine::from_weights(weights);
    m.set_biases(&vec![0.1; n_outputs]).unwrap();
    m.set_input_subtraction(&vec![0.5; n_inputs]).unwrap();
    m.set_input_division(&vec![2.0; n_inputs]).unwrap();
    m.set_activation(activation);
    m
}

fn input(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64).sin()).collect()
}

/// Benchmark single-row forward over machine sizes
fn bench_forward_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward");

    for &(n_in, n_out) in &[(3, 2), (16, 16), (128, 32), (512, 128)] {
        let m = machine(n_in, n_out, Activation::Tanh);
        let x = input(n_in);
        let mut y = vec![0.0; n_out];

        group.throughput(Throughput::Elements((n_in * n_out) as u64));
        group.bench_with_input(
            BenchmarkId::new("tanh", format!("{}x{}", n_in, n_out)),
            &x,
            |b, x| {
                b.iter(|| {
                    m.forward(black_box(x), &mut y).unwrap();
                    black_box(&y);
                })
            },
        );
    }

    group.finish();
}

/// Benchmark activation dispatch cost on a fixed shape
fn bench_activations(c: &mut Criterion) {
    let mut group = c.benchmark_group("activation");
    let x = input(64);

    for kind in Activation::ALL {
        let m = machine(64, 64, kind);
        let mut y = vec![0.0; 64];
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                m.forward(black_box(&x), &mut y).unwrap();
                black_box(&y);
            })
        });
    }

    group.finish();
}

/// Benchmark batch evaluation
fn bench_forward_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward_batch");
    let m = machine(32, 8, Activation::Logistic);

    for &rows in &[1usize, 64, 1024] {
        let data: Vec<f64> = (0..rows * 32).map(|k| (k as f64 * 0.01).cos()).collect();
        let inputs = Matrix::from_shape_vec(rows, 32, data).unwrap();

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &inputs, |b, inputs| {
            b.iter(|| black_box(m.forward_batch(inputs).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_forward_sizes,
    bench_activations,
    bench_forward_batch,
);

criterion_main!(benches);
