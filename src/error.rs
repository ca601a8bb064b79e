//! Error types for the synth core.
//!
//! Only resource acquisition and configuration can fail. Numeric edge cases
//! and invalid topology requests are handled locally and never surface here.

use thiserror::Error;

/// Result type for fallible synth operations.
pub type SynthResult<T> = Result<T, SynthError>;

#[derive(Debug, Error)]
pub enum SynthError {
    /// Every slot of the node table is occupied.
    #[error("node table is full ({capacity} nodes)")]
    CapacityExhausted { capacity: usize },

    /// Engine configuration cannot drive a stream.
    #[error("invalid engine config: {message}")]
    InvalidConfig { message: String },

    /// No default output device on the host.
    #[error("no default output device available")]
    NoOutputDevice,

    /// The device reports a sample format the engine cannot convert to.
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to query output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("failed to pause output stream: {0}")]
    PauseStream(#[from] cpal::PauseStreamError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),
}
