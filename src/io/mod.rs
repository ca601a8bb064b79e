//! Audio device I/O.

pub mod output;

pub use output::{AudioOutput, DeviceState};
