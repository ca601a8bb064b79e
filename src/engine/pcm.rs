//! Float ↔ 16-bit PCM conversion.

/// Clamp to [-1, 1] and scale to signed 16-bit. NaN becomes silence.
#[inline]
pub fn to_pcm(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

#[inline]
pub fn from_pcm(sample: i16) -> f32 {
    sample as f32 / i16::MAX as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_maps_to_extremes() {
        assert_eq!(to_pcm(1.0), i16::MAX);
        assert_eq!(to_pcm(-1.0), -i16::MAX);
        assert_eq!(to_pcm(0.0), 0);
    }

    #[test]
    fn out_of_range_clamps() {
        assert_eq!(to_pcm(3.5), i16::MAX);
        assert_eq!(to_pcm(-7.0), -i16::MAX);
        assert_eq!(to_pcm(f32::NAN), 0);
        assert_eq!(to_pcm(f32::INFINITY), i16::MAX);
    }

    #[test]
    fn half_scale() {
        assert_eq!(to_pcm(0.5), 16384);
        assert!((from_pcm(16384) - 0.5).abs() < 1e-4);
    }
}
