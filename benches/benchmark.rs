// Engine throughput benchmarks over random sparse corpora
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;

use crosswin::{cross_similarity, CrossOptions, Normalize, SparseMatrix};

/// Random docs x terms matrix with roughly `nnz_per_row` entries per row.
fn generate_corpus(docs: usize, terms: usize, nnz_per_row: usize) -> SparseMatrix {
    let mut rng = rand::rng();
    let mut triplets = Vec::with_capacity(docs * nnz_per_row);
    for doc in 0..docs {
        let mut cols: Vec<u32> = (0..terms as u32).collect();
        cols.shuffle(&mut rng);
        for &col in cols.iter().take(nnz_per_row) {
            triplets.push((doc as u32, col, rng.random_range(0.1f64..5.0)));
        }
    }
    SparseMatrix::from_triplets(docs, terms, &triplets).unwrap()
}

fn generate_dates(docs: usize, span_hours: i64) -> Vec<i64> {
    let mut rng = rand::rng();
    (0..docs)
        .map(|_| rng.random_range(0..span_hours * 3_600))
        .collect()
}

fn benchmark_self_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("self_comparison");

    for size in [100, 500, 2000].iter() {
        let m = generate_corpus(*size, 5_000, 20);
        group.bench_with_input(BenchmarkId::new("cosine", size), size, |b, _| {
            let options = CrossOptions {
                normalize: Normalize::L2,
                min_value: Some(0.2),
                only_upper: true,
                diag: false,
                ..Default::default()
            };
            b.iter(|| cross_similarity(black_box(&m), None, &options).unwrap());
        });
    }

    group.finish();
}

fn benchmark_windowed(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowed");

    let m = generate_corpus(2_000, 5_000, 20);
    let dates = generate_dates(2_000, 24 * 30);
    group.bench_function("cosine_3day_window", |b| {
        let options = CrossOptions {
            normalize: Normalize::L2,
            min_value: Some(0.2),
            date: Some(dates.clone()),
            lwindow: -3.0,
            rwindow: 3.0,
            ..Default::default()
        };
        b.iter(|| cross_similarity(black_box(&m), None, &options).unwrap());
    });

    group.finish();
}

criterion_group!(benches, benchmark_self_comparison, benchmark_windowed);
criterion_main!(benches);
