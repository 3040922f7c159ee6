//! Benchmarks for filler site generation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use starborders::sampling::{poisson_disk, PoissonDiskSampler};
use starborders::Point2;

fn bench_poisson_disk(c: &mut Criterion) {
    let mut group = c.benchmark_group("poisson_disk");

    // Vary domain size with fixed density
    for size in [200, 500, 1000, 2000] {
        let size_f = size as f64;

        group.bench_with_input(BenchmarkId::new("domain_size", size), &size_f, |b, &size| {
            b.iter(|| {
                let size = black_box(size);
                poisson_disk::<f64>(size, size, black_box(30.0), 30, 0x5EED)
            })
        });
    }

    group.finish();
}

fn bench_replace_reserved(c: &mut Criterion) {
    let mut group = c.benchmark_group("replace_reserved_points");

    for reserved in [100, 1000, 5000] {
        let mut state = 98765u64;
        let fixed: Vec<Point2<f64>> = (0..reserved)
            .map(|_| {
                let mut next = || {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    state as f64 / u64::MAX as f64 * 1000.0
                };
                Point2::new(next(), next())
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("reserved", reserved), &fixed, |b, fixed| {
            b.iter(|| {
                let mut sampler =
                    PoissonDiskSampler::new(Point2::origin(), 1000.0, 1000.0, 30.0, 0x5EED)
                        .unwrap();
                sampler.generate(30);
                sampler.replace_reserved_points(black_box(fixed))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_poisson_disk, bench_replace_reserved);
criterion_main!(benches);
