//! End-to-end scenario benchmarks.
//!
//! These drive a whole `Session` the way the front-end does once per frame.

mod frame;

pub use frame::bench_frame;
