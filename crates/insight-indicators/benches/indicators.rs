//! Benchmarks for the indicator engine.

use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use insight_core::traits::Indicator;
use insight_core::types::{PriceBar, PriceSeries};
use insight_indicators::{compute_indicators, Kdj, Macd};

fn generate_test_series(size: usize) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let bars = (0..size)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            PriceBar::new(start + Days::new(i as u64), close + 1.5, close - 1.5, close)
        })
        .collect();
    PriceSeries::new("BENCH", bars)
}

fn benchmark_macd(c: &mut Criterion) {
    let mut group = c.benchmark_group("MACD");

    for size in [250, 1250, 10000].iter() {
        let series = generate_test_series(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, series| {
            let macd = Macd::new();
            b.iter(|| macd.calculate(black_box(series.bars())))
        });
    }

    group.finish();
}

fn benchmark_kdj(c: &mut Criterion) {
    let mut group = c.benchmark_group("KDJ");

    for size in [250, 1250, 10000].iter() {
        let series = generate_test_series(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, series| {
            let kdj = Kdj::new();
            b.iter(|| kdj.calculate(black_box(series.bars())))
        });
    }

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let series = generate_test_series(1250);
    c.bench_function("engine/1250", |b| {
        b.iter(|| compute_indicators(black_box(&series)))
    });
}

criterion_group!(benches, benchmark_macd, benchmark_kdj, benchmark_engine);
criterion_main!(benches);
