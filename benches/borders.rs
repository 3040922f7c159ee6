//! Benchmarks for border extraction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use starborders::borders::{BorderExtractor, ColoredSite, NodeMode};
use starborders::sampling::poisson_disk;
use starborders::triangulation::{SpadeTriangulator, Triangulate};
use starborders::FactionId;

/// Blue-noise sites split into vertical faction bands.
fn generate_sites(size: f64, factions: u16) -> Vec<ColoredSite> {
    poisson_disk(size, size, 10.0, 30, 4242)
        .unwrap()
        .into_iter()
        .map(|p| {
            let band = (p.x / size * factions as f64) as u16;
            ColoredSite::new(p, FactionId(band.min(factions - 1) + 1))
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("border_extract");

    for size in [200.0, 500.0, 1000.0] {
        let sites = generate_sites(size, 4);
        let points: Vec<_> = sites.iter().map(|s| s.position).collect();
        let triangles = SpadeTriangulator.triangulate(&points);
        group.throughput(Throughput::Elements(triangles.len() as u64));

        let modes = [
            ("circumcenters", NodeMode::Circumcenters),
            ("centroids", NodeMode::Centroids),
        ];
        for (name, mode) in modes {
            let extractor = BorderExtractor::new(mode, 0.65);
            group.bench_with_input(
                BenchmarkId::new(name, size as u32),
                &(&sites, &triangles),
                |b, (sites, triangles)| {
                    b.iter(|| extractor.extract(black_box(sites), black_box(triangles)))
                },
            );
        }
    }

    group.finish();
}

fn bench_triangulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulate");

    for size in [200.0, 500.0, 1000.0] {
        let points: Vec<_> = generate_sites(size, 1).iter().map(|s| s.position).collect();
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_with_input(BenchmarkId::new("spade", size as u32), &points, |b, points| {
            b.iter(|| SpadeTriangulator.triangulate(black_box(points)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_triangulate);
criterion_main!(benches);
