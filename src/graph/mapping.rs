use crate::{
    graph::node::{NodeKind, NodeParams},
    math::Vec2,
    physics::config::Bounds,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Position → Parameter Mapping
============================

Where a body sits on screen decides how its node sounds.

  vertical      frequency, exponential: the top of the frame is `max_hz`,
                the bottom is `min_hz`, and equal distances are equal
                musical intervals.

                    f = min * (max / min) ^ t      t = 1 - y / height

                With 55 Hz..1760 Hz over a 600 px frame each 120 px is one
                octave, so y = 360 is 220 Hz.

  horizontal    LFO depth, linear: left edge 0.0, right edge 1.0.

  spacing       oscillator amplitude. Within `reach` of the node it feeds
                an oscillator plays at `amplitude_ceiling`; further away it
                falls off as reach / distance.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ParamMapping {
    /// Screen rectangle the mapping spans. Normally the physics bounds.
    pub frame: Bounds,
    pub oscillator_min_hz: f32,
    pub oscillator_max_hz: f32,
    pub lfo_min_hz: f32,
    pub lfo_max_hz: f32,
    pub amplitude_ceiling: f32,
    pub reach: f32,
}

impl Default for ParamMapping {
    fn default() -> Self {
        Self {
            frame: Bounds::new(800.0, 600.0),
            oscillator_min_hz: 55.0,
            oscillator_max_hz: 1760.0,
            lfo_min_hz: 0.1,
            lfo_max_hz: 20.0,
            amplitude_ceiling: 0.8,
            reach: 160.0,
        }
    }
}

impl ParamMapping {
    fn range(&self, kind: NodeKind) -> Option<(f32, f32)> {
        match kind {
            NodeKind::Oscillator => Some((self.oscillator_min_hz, self.oscillator_max_hz)),
            NodeKind::Lfo => Some((self.lfo_min_hz, self.lfo_max_hz)),
            NodeKind::Output => None,
        }
    }

    /// Frequency for a node of `kind` at height `y`. Outputs have none (0 Hz).
    pub fn frequency_at(&self, kind: NodeKind, y: f32) -> f32 {
        let Some((min, max)) = self.range(kind) else {
            return 0.0;
        };
        let height = self.frame.height();
        if height <= 0.0 || min <= 0.0 || max <= min {
            return min.max(0.0);
        }
        let t = 1.0 - ((y - self.frame.min.y) / height).clamp(0.0, 1.0);
        min * (max / min).powf(t)
    }

    /// Height at which a node of `kind` sounds `frequency`. Inverse of `frequency_at`.
    pub fn y_for_frequency(&self, kind: NodeKind, frequency: f32) -> Option<f32> {
        let (min, max) = self.range(kind)?;
        if min <= 0.0 || max <= min {
            return None;
        }
        let f = frequency.clamp(min, max);
        let t = (f / min).ln() / (max / min).ln();
        Some(self.frame.min.y + (1.0 - t) * self.frame.height())
    }

    /// LFO depth at horizontal position `x`.
    pub fn depth_at(&self, x: f32) -> f32 {
        let width = self.frame.width();
        if width <= 0.0 {
            return 0.0;
        }
        ((x - self.frame.min.x) / width).clamp(0.0, 1.0)
    }

    /// Oscillator amplitude for a given distance to its target.
    ///
    /// `None` (unconnected) plays at the ceiling.
    pub fn amplitude_for(&self, spacing: Option<f32>) -> f32 {
        let ceiling = self.amplitude_ceiling.clamp(0.0, 1.0);
        match spacing {
            Some(distance) if distance > self.reach && self.reach > 0.0 => {
                ceiling * (self.reach / distance)
            }
            _ => ceiling,
        }
    }

    pub fn params_for(&self, kind: NodeKind, position: Vec2, spacing: Option<f32>) -> NodeParams {
        NodeParams {
            frequency: self.frequency_at(kind, position.y),
            amplitude: self.amplitude_for(spacing),
            depth: self.depth_at(position.x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_spans_range_top_to_bottom() {
        let mapping = ParamMapping::default();
        let top = mapping.frequency_at(NodeKind::Oscillator, 0.0);
        let bottom = mapping.frequency_at(NodeKind::Oscillator, 600.0);
        assert!((top - 1760.0).abs() < 1e-2);
        assert!((bottom - 55.0).abs() < 1e-3);
    }

    #[test]
    fn one_octave_per_fifth_of_the_frame() {
        let mapping = ParamMapping::default();
        let f = mapping.frequency_at(NodeKind::Oscillator, 360.0);
        assert!((f - 220.0).abs() < 1e-2, "got {f}");

        let octave_up = mapping.frequency_at(NodeKind::Oscillator, 240.0);
        assert!((octave_up / f - 2.0).abs() < 1e-4);
    }

    #[test]
    fn y_for_frequency_inverts_frequency_at() {
        let mapping = ParamMapping::default();
        for &hz in &[55.0, 110.0, 220.0, 440.0, 1000.0] {
            let y = mapping.y_for_frequency(NodeKind::Oscillator, hz).unwrap();
            let back = mapping.frequency_at(NodeKind::Oscillator, y);
            assert!((back - hz).abs() / hz < 1e-4, "{hz} -> {y} -> {back}");
        }
        assert_eq!(mapping.y_for_frequency(NodeKind::Output, 220.0), None);
    }

    #[test]
    fn positions_outside_frame_clamp() {
        let mapping = ParamMapping::default();
        assert!((mapping.frequency_at(NodeKind::Lfo, -100.0) - 20.0).abs() < 1e-3);
        assert!((mapping.frequency_at(NodeKind::Lfo, 900.0) - 0.1).abs() < 1e-5);
        assert_eq!(mapping.depth_at(-5.0), 0.0);
        assert_eq!(mapping.depth_at(10_000.0), 1.0);
    }

    #[test]
    fn output_has_no_frequency() {
        let mapping = ParamMapping::default();
        assert_eq!(mapping.frequency_at(NodeKind::Output, 300.0), 0.0);
    }

    #[test]
    fn amplitude_falls_off_beyond_reach() {
        let mapping = ParamMapping::default();
        assert_eq!(mapping.amplitude_for(None), 0.8);
        assert_eq!(mapping.amplitude_for(Some(50.0)), 0.8);
        assert!((mapping.amplitude_for(Some(320.0)) - 0.4).abs() < 1e-6);
    }
}
