//! Realtime renderer: turns the shared patch bay into samples.

pub mod audio;
pub mod config;
pub mod pcm;

pub use audio::AudioEngine;
pub use config::EngineConfig;
pub use pcm::{from_pcm, to_pcm};
