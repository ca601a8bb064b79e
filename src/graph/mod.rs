//! The signal graph shared between the simulation loop and the audio callback.
//!
//! Node kinds and their per-sample DSP live in `node`. The topology and the
//! parameters the simulation publishes live in the lock-free `bay`, which
//! has exactly one writer (`GraphEditor`) and any number of readers.

/// Wait-free `f32` cell.
pub mod atomic;
/// Shared node table and its single writer.
pub mod bay;
/// How positions become frequencies, depths and amplitudes.
pub mod mapping;
/// Node kinds, ids and per-sample processing.
pub mod node;

pub use bay::{ConnectOutcome, GraphEditor, IgnoreReason, PatchBay};
pub use mapping::ParamMapping;
pub use node::{NodeId, NodeKind, NodeParams, SignalNode};
