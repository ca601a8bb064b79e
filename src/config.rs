//! Top-level configuration.
//!
//! Every section falls back to its defaults, so an empty file (or no file at
//! all) gives the stock 800×600 field at 44.1 kHz.

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use crate::error::SynthResult;
use crate::{engine::config::EngineConfig, graph::mapping::ParamMapping, physics::config::PhysicsConfig};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    pub physics: PhysicsConfig,
    pub engine: EngineConfig,
    pub mapping: ParamMapping,
    /// Seed for spawn placement when the pointer position is unknown.
    pub seed: u64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            engine: EngineConfig::default(),
            mapping: ParamMapping::default(),
            seed: 0x5eed,
        }
    }
}

#[cfg(feature = "serde")]
impl SynthConfig {
    pub fn from_toml_str(source: &str) -> SynthResult<Self> {
        let config: SynthConfig = toml::from_str(source)?;
        config.engine.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> SynthResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
