//! Benchmarks for the Verlet step, dominated by pairwise collisions.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use physynth::{
    graph::NodeKind,
    math::Vec2,
    physics::{PhysicsConfig, PhysicsWorld},
};

use crate::NODE_COUNTS;

/// Bodies on a loose grid, close enough that neighbours collide.
fn crowded_world(count: usize) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(PhysicsConfig::default());
    for i in 0..count {
        let position = Vec2::new(60.0 + (i % 8) as f32 * 35.0, 60.0 + (i / 8) as f32 * 35.0);
        let _ = world.spawn(position, NodeKind::Oscillator);
    }
    world
}

pub fn bench_physics(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives/physics");

    for &count in NODE_COUNTS {
        let mut world = crowded_world(count);
        group.bench_with_input(BenchmarkId::new("tick", count), &count, |b, _| {
            b.iter(|| world.tick(black_box(1.0 / 60.0)))
        });

        let mut dragged = crowded_world(count);
        dragged.set_pointer(Vec2::new(60.0, 60.0));
        dragged.set_selection(Vec2::new(60.0, 60.0));
        dragged.set_pointer(Vec2::new(700.0, 500.0));
        group.bench_with_input(BenchmarkId::new("tick_dragging", count), &count, |b, _| {
            b.iter(|| dragged.tick(black_box(1.0 / 60.0)))
        });
    }

    group.finish();
}
