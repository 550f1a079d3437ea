//! Benchmark: magnet grid construction and nearest-slot queries.
//!
//! Run with: `cargo bench -p dredge-core --bench magnet_bench`
//!
//! The grid query runs on every pointer move over a reordering list, so it
//! sits on the hot path of the drag gesture. Measures the O(N) nearest scan
//! at realistic and adversarial list sizes.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use dredge_core::geometry::{Point, Rect};
use dredge_core::magnet::{Direction, MagnetGrid};
use dredge_core::scene::ItemGeometry;

fn column(len: usize) -> Vec<ItemGeometry> {
    (0..len)
        .map(|i| ItemGeometry {
            rect: Rect::new(0.0, i as f32 * 40.0, 240.0, 40.0),
            hosts_drop: i % 8 == 0,
        })
        .collect()
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("magnet_grid_new");
    for len in [10usize, 100, 1000] {
        let items = column(len);
        group.bench_function(format!("{len}_items"), |b| {
            b.iter(|| {
                MagnetGrid::new(
                    black_box(&items),
                    Direction::Column,
                    Some(len / 2),
                    Point::new(0.0, 0.0),
                )
            });
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("magnet_grid_closest_index");
    for len in [10usize, 100, 1000] {
        let grid = MagnetGrid::new(
            &column(len),
            Direction::Column,
            Some(len / 2),
            Point::new(0.0, 0.0),
        )
        .unwrap();
        let pointer = Point::new(120.0, len as f32 * 20.0);
        group.bench_function(format!("{len}_items"), |b| {
            b.iter(|| grid.closest_index(black_box(pointer), black_box(Point::new(0.0, -35.0))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_construction, bench_query);
criterion_main!(benches);
