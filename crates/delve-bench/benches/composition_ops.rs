//! Criterion micro-benchmarks for composition, translation and audit.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use delve_bench::{filled_level, stacked_floors};
use delve_core::{Coordinate, CoordinateSystem};
use delve_dungeon::World;

/// Benchmark: attach four filled 16x16 levels side by side, joining every
/// boundary square.
fn bench_compose_quadrants(c: &mut Criterion) {
    c.bench_function("compose_quadrants_16x16", |b| {
        b.iter_batched(
            || {
                let mut world = World::default();
                let root = world
                    .create_composite(
                        CoordinateSystem::new(Coordinate::ORIGIN, Coordinate::new(31, 31, 0))
                            .unwrap(),
                    )
                    .unwrap();
                let levels: Vec<_> = (0..4)
                    .map(|_| filled_level(&mut world, 16, 16).unwrap())
                    .collect();
                (world, root, levels)
            },
            |(mut world, root, levels)| {
                let offsets = [(0, 0), (16, 0), (0, 16), (16, 16)];
                for (&level, (x, y)) in levels.iter().zip(offsets) {
                    world
                        .add_sub_dungeon_at(root, Coordinate::new(x, y, 0), level)
                        .unwrap();
                }
                black_box(world.square_count(root).unwrap());
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: translate a four-floor complex back and forth.
fn bench_translate_stack(c: &mut Criterion) {
    let (mut world, root) = stacked_floors(16, 4).unwrap();
    c.bench_function("translate_stack_16x16x4", |b| {
        b.iter(|| {
            world.translate(root, Coordinate::new(100, 200, 0)).unwrap();
            world.translate(root, Coordinate::new(-100, -200, 0)).unwrap();
        });
    });
}

/// Benchmark: full consistency audit of a four-floor complex.
fn bench_audit_stack(c: &mut Criterion) {
    let (world, _) = stacked_floors(16, 4).unwrap();
    c.bench_function("audit_stack_16x16x4", |b| {
        b.iter(|| black_box(world.audit()));
    });
}

/// Benchmark: lazily walk every square of a four-floor complex.
fn bench_iterate_stack(c: &mut Criterion) {
    let (world, root) = stacked_floors(16, 4).unwrap();
    c.bench_function("iterate_stack_16x16x4", |b| {
        b.iter(|| black_box(world.squares(root).unwrap().count()));
    });
}

criterion_group!(
    benches,
    bench_compose_quadrants,
    bench_translate_stack,
    bench_audit_stack,
    bench_iterate_stack
);
criterion_main!(benches);
