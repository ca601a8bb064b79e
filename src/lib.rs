pub mod bridge; // Input events → world and graph mutations
pub mod config;
pub mod engine; // Realtime renderer
pub mod error;
pub mod graph; // Signal nodes and the shared patch bay
pub mod io;
pub mod math;
pub mod physics; // Verlet particle world
pub mod session;

pub use config::SynthConfig;
pub use error::{SynthError, SynthResult};
pub use session::Session;

pub const SAMPLE_RATE: u32 = engine::config::DEFAULT_SAMPLE_RATE;
pub const BUFFER_SIZE: u32 = engine::config::DEFAULT_BUFFER_SIZE;
/// Capacity of the node table shared with the audio callback.
pub const MAX_NODES: usize = 64;
