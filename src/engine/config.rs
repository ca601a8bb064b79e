use crate::error::{SynthError, SynthResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_BUFFER_SIZE: u32 = 4096;

/// Output stream shape requested from the host.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub sample_rate: u32,
    /// Frames per callback.
    pub buffer_size: u32,
    pub channels: u16,
}

impl EngineConfig {
    pub fn validate(&self) -> SynthResult<()> {
        if self.sample_rate == 0 {
            return Err(SynthError::InvalidConfig {
                message: "sample_rate must be positive".into(),
            });
        }
        if self.buffer_size == 0 {
            return Err(SynthError::InvalidConfig {
                message: "buffer_size must be positive".into(),
            });
        }
        if self.channels == 0 {
            return Err(SynthError::InvalidConfig {
                message: "channels must be positive".into(),
            });
        }
        Ok(())
    }

    /// Real-time deadline of one buffer, in seconds.
    pub fn buffer_duration(&self) -> f64 {
        self.buffer_size as f64 / self.sample_rate as f64
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            channels: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        // 4096 frames at 44.1 kHz ≈ 92.9 ms
        assert!((config.buffer_duration() - 0.092_879).abs() < 1e-5);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = EngineConfig {
            sample_rate: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(SynthError::InvalidConfig { .. })));

        let config = EngineConfig {
            buffer_size: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
