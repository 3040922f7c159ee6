//! Benchmarks for the overlap grid.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use starborders::spatial::OverlapGrid;
use starborders::{Rect, RectId, RectKind};

/// Generates random label-sized rectangles inside a 1000x1000 view.
fn generate_random_rects(count: usize, seed: u64) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(count);
    let mut state = seed;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state as f64 / u64::MAX as f64
    };

    for i in 0..count {
        let x = next() * 980.0;
        let y = next() * 990.0;
        let w = next() * 60.0 + 10.0;
        let h = next() * 6.0 + 8.0;
        rects.push(Rect::new(x, y, w, h, RectId::new(RectKind::SiteLabel, i)));
    }

    rects
}

fn view() -> Rect {
    Rect::new(0.0, 0.0, 1000.0, 1000.0, RectId::new(RectKind::Obstacle, 0))
}

fn bench_grid_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_place");

    for count in [100, 1000, 10000] {
        let rects = generate_random_rects(count, 12345);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("rects", count), &rects, |b, rects| {
            b.iter(|| {
                let mut grid = OverlapGrid::new(view(), 50.0).unwrap();
                for r in rects {
                    grid.place(black_box(*r));
                }
                grid
            })
        });
    }

    group.finish();
}

fn bench_grid_count(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_count");

    for cell_size in [25.0, 50.0, 100.0] {
        let rects = generate_random_rects(5000, 12345);
        let queries = generate_random_rects(1000, 54321);
        let mut grid = OverlapGrid::new(view(), cell_size).unwrap();
        for r in &rects {
            grid.place(*r);
        }
        group.throughput(Throughput::Elements(1000));

        group.bench_with_input(
            BenchmarkId::new("queries_1000", cell_size as u32),
            &(&grid, &queries),
            |b, (grid, queries)| {
                b.iter(|| {
                    queries
                        .iter()
                        .map(|q| grid.count(black_box(q), Some(RectKind::Site)))
                        .sum::<usize>()
                })
            },
        );
    }

    group.finish();
}

fn bench_grid_move(c: &mut Criterion) {
    let rects = generate_random_rects(5000, 12345);
    let mut grid = OverlapGrid::new(view(), 50.0).unwrap();
    for r in &rects {
        grid.place(*r);
    }

    // Unplace and re-place a label, as one tabu move does.
    c.bench_function("grid_move", |b| {
        let mut i = 0;
        b.iter(|| {
            let r = rects[i % rects.len()];
            grid.unplace(r.id);
            grid.place(Rect { x: r.x + 1.0, ..r });
            i += 1;
        })
    });
}

criterion_group!(benches, bench_grid_place, bench_grid_count, bench_grid_move);
criterion_main!(benches);
