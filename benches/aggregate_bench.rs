//! Criterion benchmarks for the aggregation pipeline

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use salescope::services::{box_plot_stats, kpi_summary, normalize, prices_by_model, Aggregator};
use salescope::types::{RawRecord, SalesRecord};
use serde_json::json;
use std::hint::black_box;

const COMPANIES: [&str; 6] = ["Toyota", "Honda", "Ford", "Chevrolet", "BMW", "Mercedes"];
const MODELS: [&str; 8] = [
    "Camry", "Corolla", "Civic", "Accord", "F-150", "Malibu", "X5", "C-Class",
];

/// Deterministic synthetic export of `n` rows
fn synthetic_raw(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let sales = (i % 37 + 1) as u64;
            let value = json!({
                "date": format!("{}-{:02}-{:02}", 2019 + i % 6, i % 12 + 1, i % 28 + 1),
                "company": COMPANIES[i % COMPANIES.len()],
                "model": MODELS[i % MODELS.len()],
                "total_sales": sales,
                "total_revenue": sales as f64 * (20_000.0 + (i % 500) as f64 * 97.0),
            });
            serde_json::from_value(value).unwrap()
        })
        .collect()
}

fn records(n: usize) -> Vec<SalesRecord> {
    normalize(&synthetic_raw(n))
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    for n in [1_000, 10_000] {
        let raw = synthetic_raw(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &raw, |b, raw| {
            b.iter(|| normalize(black_box(raw)));
        });
    }
    group.finish();
}

fn bench_rollups(c: &mut Criterion) {
    let mut group = c.benchmark_group("rollup");
    for n in [1_000, 10_000] {
        let data = records(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("by_month", n), &data, |b, data| {
            b.iter(|| Aggregator::by_month(black_box(data)));
        });
        group.bench_with_input(BenchmarkId::new("kpi_summary", n), &data, |b, data| {
            b.iter(|| kpi_summary(black_box(data)));
        });
    }
    group.finish();
}

fn bench_box_plot(c: &mut Criterion) {
    let data = records(10_000);
    let prices = prices_by_model(&data);
    c.bench_function("box_plot_stats/10000", |b| {
        b.iter(|| box_plot_stats(black_box(&prices)));
    });
}

criterion_group!(benches, bench_normalize, bench_rollups, bench_box_plot);
criterion_main!(benches);
