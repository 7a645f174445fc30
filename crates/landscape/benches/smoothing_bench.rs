//! Criterion benchmarks for height edits and smoothing propagation.
//!
//! Benchmarks:
//!   - level a 10x10 rectangle on a flat grid, smoothing off / on
//!   - raise a single tile by 2m with smoothing (wide propagation)
//!   - a full event-driven frame through `LandscapePlugin`
//!
//! Run with: cargo bench -p landscape --bench smoothing_bench --features bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use landscape::config::WorldConfig;
use landscape::grid::{TileDefaults, TileGrid};
use landscape::landscaping::{propagate_smoothing, TerrainEditor};
use landscape::test_harness::TestWorld;
use landscape::tile::TileCoord;

const GRID_SIZE: u32 = 250;

fn flat_grid() -> TileGrid {
    TileGrid::new(GRID_SIZE, TileDefaults::default())
}

fn rectangle(x0: u32, z0: u32, side: u32) -> Vec<TileCoord> {
    (z0..z0 + side)
        .flat_map(|z| (x0..x0 + side).map(move |x| TileCoord::new(x, z)))
        .collect()
}

fn bench_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_10x10");
    let tiles = rectangle(100, 100, 10);
    let config = WorldConfig::default();

    for (name, smoothing) in [("flat", false), ("smoothed", true)] {
        let editor = TerrainEditor::from_config(&config).with_smoothing(smoothing);
        group.bench_function(name, |b| {
            b.iter_batched(
                flat_grid,
                |mut grid| black_box(editor.level_terrain(&mut grid, &tiles, 3.0)),
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_spike_propagation(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothing_spike");
    group.sample_size(50);
    let seed = [TileCoord::new(125, 125)];

    group.bench_function("spike_2m", |b| {
        b.iter_batched(
            || {
                let mut grid = flat_grid();
                if let Some(tile) = grid.tile_mut(seed[0]) {
                    tile.set_uniform_height(2.0);
                }
                grid
            },
            |mut grid| black_box(propagate_smoothing(&mut grid, &seed, 30)),
            BatchSize::LargeInput,
        );
    });
    group.finish();
}

fn bench_event_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_frame");
    group.sample_size(20);
    let mut world = TestWorld::new().with_smoothing(true);
    let tiles = rectangle(60, 60, 8);
    let mut raising = true;

    group.bench_function("raise_lower_8x8", |b| {
        b.iter(|| {
            if raising {
                world.send_raise(tiles.clone(), 0.25);
            } else {
                world.send_lower(tiles.clone(), 0.25);
            }
            raising = !raising;
            world.tick(1).mark_all_drawn();
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_level,
    bench_spike_propagation,
    bench_event_frame
);
criterion_main!(benches);
