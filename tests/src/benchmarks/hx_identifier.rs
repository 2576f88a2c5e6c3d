//! # Identifier Space Benchmarks
//!
//! Distance and prefix computations run once per notify and once per
//! selector comparison, so they dominate placement cost.

use criterion::{black_box, BenchmarkId, Criterion};
use hx_identifier::{orthant_number, Identifier, Metric};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Shapes exercised: small test space, default space, wide digits.
const SHAPES: [(usize, usize); 3] = [(2, 4), (4, 32), (16, 16)];

pub fn bench_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("hx-identifier/distance");
    group.measurement_time(Duration::from_secs(5));
    let mut rng = StdRng::seed_from_u64(1);

    for (dims, digits) in SHAPES {
        let a = Identifier::random(dims, digits, &mut rng).unwrap();
        let b = Identifier::random(dims, digits, &mut rng).unwrap();
        for metric in Metric::ALL {
            group.bench_with_input(
                BenchmarkId::new(metric.to_string(), format!("{dims}x{digits}")),
                &(a.clone(), b.clone()),
                |bench, (a, b)| bench.iter(|| black_box(metric.measure(a, b))),
            );
        }
    }

    group.finish();
}

pub fn bench_prefix_and_orthant(c: &mut Criterion) {
    let mut group = c.benchmark_group("hx-identifier/geometry");
    let mut rng = StdRng::seed_from_u64(2);

    for (dims, digits) in SHAPES {
        let a = Identifier::random(dims, digits, &mut rng).unwrap();
        let b = Identifier::random(dims, digits, &mut rng).unwrap();
        let label = format!("{dims}x{digits}");
        group.bench_function(BenchmarkId::new("common_prefix", &label), |bench| {
            bench.iter(|| black_box(a.common_prefix_length(&b)))
        });
        group.bench_function(BenchmarkId::new("orthant", &label), |bench| {
            bench.iter(|| black_box(orthant_number(&a, &b)))
        });
        group.bench_function(BenchmarkId::new("hash", &label), |bench| {
            bench.iter(|| black_box(a.calculate_hash()))
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_distance(c);
    bench_prefix_and_orthant(c);
}
