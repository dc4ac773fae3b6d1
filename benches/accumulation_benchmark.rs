// ============================================================================
// Accumulation Benchmarks
// ============================================================================
//
// Benchmark Categories:
// 1. Strategy Comparison - The four representations at the same part count
// 2. Scaling - How each strategy grows with the number of parts
// 3. Full Run - Suite plus in-memory sink insertion
// ============================================================================

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fraction_drift::prelude::*;
use std::hint::black_box;

fn kinds(parts: u32) -> [(&'static str, AccumulatorKind); 4] {
    [
        ("float64", AccumulatorKind::Float64 { parts }),
        (
            "scaled_integer",
            AccumulatorKind::ScaledInteger {
                parts,
                scale: 100_000_000,
            },
        ),
        ("exact_rational", AccumulatorKind::ExactRational { parts }),
        ("rounded_decimal", AccumulatorKind::RoundedDecimal { parts }),
    ]
}

// ============================================================================
// Strategy Comparison
// ============================================================================

fn benchmark_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_comparison");

    for (name, kind) in kinds(49) {
        let accumulator = create_accumulator(kind);
        group.bench_function(name, |b| {
            b.iter(|| black_box(accumulator.accumulate()));
        });
    }

    group.finish();
}

// ============================================================================
// Scaling
// ============================================================================

fn benchmark_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for parts in [10u32, 49, 1_000].iter() {
        for (name, kind) in kinds(*parts) {
            let accumulator = create_accumulator(kind);
            group.bench_with_input(BenchmarkId::new(name, parts), parts, |b, _| {
                b.iter(|| black_box(accumulator.accumulate()));
            });
        }
    }

    group.finish();
}

// ============================================================================
// Full Run
// ============================================================================

fn benchmark_full_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_run");

    for layout in [RecordLayout::Combined, RecordLayout::PerStrategy] {
        let engine = CalculationEngine::standard(layout);
        group.bench_function(format!("{layout:?}"), |b| {
            b.iter(|| {
                let mut sink = MemorySink::default();
                sink.ensure_schema().unwrap();
                black_box(engine.run(&mut sink, &mut std::io::sink()))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_strategies,
    benchmark_scaling,
    benchmark_full_run,
);
criterion_main!(benches);
