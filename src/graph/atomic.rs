use std::sync::atomic::{AtomicU32, Ordering};

/// An `f32` stored as its bit pattern in an `AtomicU32`.
///
/// Loads and stores are wait-free, so the audio callback can read a value
/// the simulation thread is rewriting without ever blocking. A reader sees
/// either the old or the new value, never a torn mix.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub const fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    /// Relaxed load, suitable for audio-rate reads of independent scalars.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn set(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_exact_bits() {
        let value = AtomicF32::new(0.5);
        assert_eq!(value.get(), 0.5);

        value.set(-123.456);
        assert_eq!(value.get(), -123.456);

        value.set(f32::NAN);
        assert!(value.get().is_nan());
    }
}
