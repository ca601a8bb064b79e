//! Constraint-based 2D particle simulation.
//!
//! Bodies are integrated with position Verlet and a fixed number of
//! sub-steps per visual frame. The world is single-threaded and owned by the
//! simulation loop; nothing here is touched by the audio callback.

/// Verlet state of one body.
pub mod body;
/// Tunables: sub-steps, drag, damping, collisions, bounds.
pub mod config;
/// Arena of bodies and the per-frame step.
pub mod world;

pub use body::ParticleBody;
pub use config::{Bounds, PhysicsConfig};
pub use world::{Entity, PhysicsWorld};
