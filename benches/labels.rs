//! Benchmarks for the point and border label placers.

use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use starborders::borders::{BorderExtractor, ColoredSite};
use starborders::config::{BorderLabelConfig, PointLabelConfig};
use starborders::labels::{BorderLabelPlacer, GlyphMetrics, LabelAnchor, PointLabelPlacer};
use starborders::sampling::poisson_disk;
use starborders::spatial::OverlapGrid;
use starborders::triangulation::{SpadeTriangulator, Triangulate};
use starborders::{Faction, FactionId, FactionRegistry, Rect, RectId, RectKind};

fn glyphs() -> GlyphMetrics {
    let widths = HashMap::from([(' ', 4.0), ('i', 3.0), ('m', 11.0)]);
    GlyphMetrics::new(widths, 7.0, 12.0).unwrap()
}

fn view(size: f64) -> Rect {
    Rect::new(0.0, 0.0, size, size, RectId::new(RectKind::Obstacle, 0))
}

fn bench_point_labels(c: &mut Criterion) {
    let mut group = c.benchmark_group("point_labels");
    let config = PointLabelConfig::default();
    let glyphs = glyphs();

    for spacing in [40.0, 25.0, 15.0] {
        let anchors: Vec<LabelAnchor> = poisson_disk(800.0, 800.0, spacing, 30, 99)
            .unwrap()
            .into_iter()
            .enumerate()
            .map(|(i, p)| LabelAnchor::system(p, 3.0, format!("System {i}")))
            .collect();

        let placer = PointLabelPlacer::new(&config, &glyphs);
        let id = BenchmarkId::new("spacing", spacing as u32);
        group.bench_with_input(id, &anchors, |b, anchors| {
            b.iter(|| {
                let mut grid = OverlapGrid::new(view(800.0), 50.0).unwrap();
                placer.place(black_box(anchors), &mut grid)
            })
        });
    }

    group.finish();
}

fn bench_border_labels(c: &mut Criterion) {
    let mut group = c.benchmark_group("border_labels");
    let config = BorderLabelConfig::default();
    let glyphs = glyphs();

    let mut registry = FactionRegistry::new();
    let names = [
        ("LC", "Lyran Commonwealth"),
        ("FS", "Federated Suns"),
        ("DC", "Draconis Combine"),
    ];
    for (code, name) in names {
        registry
            .register(code, Faction::new(code, name, "#808080"))
            .unwrap();
    }

    for size in [400.0, 800.0] {
        let sites: Vec<ColoredSite> = poisson_disk(size, size, 12.0, 30, 7)
            .unwrap()
            .into_iter()
            .map(|p| {
                let f = if p.y < size / 2.0 {
                    1
                } else if p.x < size / 2.0 {
                    2
                } else {
                    3
                };
                ColoredSite::new(p, FactionId(f))
            })
            .collect();
        let points: Vec<_> = sites.iter().map(|s| s.position).collect();
        let triangles = SpadeTriangulator.triangulate(&points);
        let map = BorderExtractor::default().extract(&sites, &triangles);

        let placer = BorderLabelPlacer::new(&config, &glyphs, view(size), 0.5)
            .expect("default border label config is valid");
        group.bench_with_input(BenchmarkId::new("size", size as u32), &map, |b, map| {
            b.iter(|| {
                let mut grid = OverlapGrid::new(view(size), 50.0).unwrap();
                placer.place(black_box(map), &registry, &mut grid)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_point_labels, bench_border_labels);
criterion_main!(benches);
