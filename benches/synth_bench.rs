//! Benchmarks for the two halves of the synth and their coupling.
//!
//! Run with: cargo bench
//!
//! Deadlines at 44.1 kHz:
//!   - 512 frames  = 11.6ms
//!   - 4096 frames = 92.9ms  (the default device buffer)
//! and one visual frame is ~16ms, which the physics tick must fit well inside.
//!
//! Benchmark groups:
//!   - primitives/physics  PhysicsWorld::tick at growing body counts
//!   - primitives/engine   AudioEngine::render_pcm over graphs of growing size
//!   - scenarios/frame     One full simulation frame: tick, param sync, scene

use criterion::{criterion_group, criterion_main};

mod primitives;
mod scenarios;

/// Device buffer sizes worth measuring.
pub const BUFFER_SIZES: &[usize] = &[512, 4096];

/// Node counts from a sparse patch up to a full table.
pub const NODE_COUNTS: &[usize] = &[4, 16, 64];

criterion_group!(
    benches,
    primitives::bench_physics,
    primitives::bench_engine,
    scenarios::bench_frame,
);
criterion_main!(benches);
