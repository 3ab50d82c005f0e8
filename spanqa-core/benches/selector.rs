use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use spanqa::{ScorePair, SpanSelector};

/// Deterministic pseudo-logits so runs are comparable
fn logits(len: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) as f64 / u32::MAX as f64) * 20.0 - 10.0
        })
        .collect()
}

fn select_benchmarks(c: &mut Criterion) {
    let selector = SpanSelector::default();
    let mut group = c.benchmark_group("select");
    for len in [100usize, 400] {
        let start = logits(len, 1);
        let end = logits(len, 2);
        group.bench_with_input(BenchmarkId::new("single", len), &len, |b, _| {
            b.iter(|| selector.select(black_box(&start), black_box(&end)).unwrap());
        });
    }
    group.finish();
}

fn batch_benchmarks(c: &mut Criterion) {
    let selector = SpanSelector::default();
    let mut group = c.benchmark_group("select_batch");
    for len in [100usize, 400] {
        let batch: Vec<ScorePair> = (0..32)
            .map(|i| ScorePair::new(logits(len, 2 * i), logits(len, 2 * i + 1)))
            .collect();
        group.bench_with_input(BenchmarkId::new("batch32", len), &len, |b, _| {
            b.iter(|| selector.select_batch(black_box(&batch)));
        });
    }
    group.finish();
}

criterion_group!(benches, select_benchmarks, batch_benchmarks);
criterion_main!(benches);
