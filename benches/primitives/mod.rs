//! Benchmarks for the realtime renderer and the particle step in isolation.

mod engine;
mod physics;

pub use engine::bench_engine;
pub use physics::bench_physics;
