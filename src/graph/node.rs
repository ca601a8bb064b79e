use std::{f32::consts::TAU, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Signal Nodes
============

Every draggable body carries one signal node. There are exactly three kinds,
so they are a closed enum rather than trait objects:

  Oscillator   Sound source. Ignores its input and emits
               amplitude * sin(2π * phase).

  Lfo          Amplitude modulator. Multiplies whatever is chained before it
               by (1 + depth * sin(2π * phase)). Tremolo at low rates,
               AM sidebands at audio rates.

  Output       Sink. Passes its input through unchanged. Only outputs are
               polled by the audio engine.

Phase
-----

Phase is kept in [0, 1) and advances by frequency / sample_rate per sample:

    phase 0.0   0.25   0.5   0.75   1.0 → wraps to 0.0
    sin   0     +1     0     -1     0

A node only advances when the engine evaluates it, which happens only when
it sits on a chain that ends in an Output.

Connection Rules
----------------

Edges point downstream (source → target):

    Oscillator ──→ Lfo ──→ Lfo ──→ Output
    Oscillator ──→ Output

  Oscillator  may feed an Lfo or an Output
  Lfo         may feed an Lfo or an Output
  Output      feeds nothing

Nothing feeds an Oscillator, since it would ignore the signal anyway.
*/

/// Stable index of a node in the shared node table and the physics arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeKind {
    Oscillator = 1,
    Lfo = 2,
    Output = 3,
}

impl NodeKind {
    pub(crate) const fn to_raw(self) -> u8 {
        self as u8
    }

    pub(crate) const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(NodeKind::Oscillator),
            2 => Some(NodeKind::Lfo),
            3 => Some(NodeKind::Output),
            _ => None,
        }
    }

    /// Whether an edge `self → target` is allowed.
    pub const fn can_feed(self, target: NodeKind) -> bool {
        matches!(
            (self, target),
            (NodeKind::Oscillator, NodeKind::Output)
                | (NodeKind::Oscillator, NodeKind::Lfo)
                | (NodeKind::Lfo, NodeKind::Output)
                | (NodeKind::Lfo, NodeKind::Lfo)
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            NodeKind::Oscillator => "osc",
            NodeKind::Lfo => "lfo",
            NodeKind::Output => "out",
        }
    }
}

/// Synthesis parameters of one node, as published by the simulation side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeParams {
    /// Hz. Unused by outputs.
    pub frequency: f32,
    /// Peak level of an oscillator, in [0, 1].
    pub amplitude: f32,
    /// Modulation depth of an LFO, in [0, 1].
    pub depth: f32,
}

impl Default for NodeParams {
    fn default() -> Self {
        Self {
            frequency: 440.0,
            amplitude: 0.8,
            depth: 0.5,
        }
    }
}

/// Per-sample DSP state of a node. Lives on the audio side only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalNode {
    Oscillator { phase: f32 },
    Lfo { phase: f32 },
    Output,
}

impl SignalNode {
    pub fn new(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Oscillator => SignalNode::Oscillator { phase: 0.0 },
            NodeKind::Lfo => SignalNode::Lfo { phase: 0.0 },
            NodeKind::Output => SignalNode::Output,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            SignalNode::Oscillator { .. } => NodeKind::Oscillator,
            SignalNode::Lfo { .. } => NodeKind::Lfo,
            SignalNode::Output => NodeKind::Output,
        }
    }

    pub fn phase(&self) -> Option<f32> {
        match *self {
            SignalNode::Oscillator { phase } | SignalNode::Lfo { phase } => Some(phase),
            SignalNode::Output => None,
        }
    }

    pub fn reset(&mut self) {
        *self = SignalNode::new(self.kind());
    }

    /// Transform one sample.
    #[inline]
    pub fn process(&mut self, input: f32, params: &NodeParams, sample_rate: f32) -> f32 {
        match self {
            SignalNode::Oscillator { phase } => {
                let out = params.amplitude * (TAU * *phase).sin();
                advance_phase(phase, params.frequency, sample_rate);
                out
            }
            SignalNode::Lfo { phase } => {
                advance_phase(phase, params.frequency, sample_rate);
                input * (1.0 + params.depth * (TAU * *phase).sin())
            }
            SignalNode::Output => input,
        }
    }
}

#[inline]
fn advance_phase(phase: &mut f32, frequency: f32, sample_rate: f32) {
    let next = *phase + frequency / sample_rate;
    if !next.is_finite() {
        *phase = 0.0;
        return;
    }
    let wrapped = next - next.floor();
    // Tiny negative values wrap to exactly 1.0 in f32.
    *phase = if wrapped >= 1.0 { 0.0 } else { wrapped };
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 44_100.0;

    #[test]
    fn valid_sine() {
        let params = NodeParams {
            frequency: 220.0,
            amplitude: 0.5,
            depth: 0.0,
        };
        let mut osc = SignalNode::new(NodeKind::Oscillator);

        let samples: Vec<f32> = (0..64).map(|_| osc.process(0.0, &params, SR)).collect();

        // sample n should be a * sin(2pi f n / sr)
        let n = 12;
        let expected = 0.5 * (TAU * 220.0 * n as f32 / SR).sin();
        assert!(
            (samples[n] - expected).abs() < 1e-5,
            "expected {expected}, got {}",
            samples[n]
        );
    }

    #[test]
    fn oscillator_ignores_input() {
        let params = NodeParams::default();
        let mut a = SignalNode::new(NodeKind::Oscillator);
        let mut b = SignalNode::new(NodeKind::Oscillator);
        for _ in 0..100 {
            assert_eq!(a.process(0.0, &params, SR), b.process(0.7, &params, SR));
        }
    }

    #[test]
    fn phase_stays_in_unit_interval() {
        let params = NodeParams {
            frequency: 19_000.0,
            ..NodeParams::default()
        };
        let mut osc = SignalNode::new(NodeKind::Oscillator);
        for _ in 0..10_000 {
            osc.process(0.0, &params, SR);
            let phase = osc.phase().unwrap();
            assert!((0.0..1.0).contains(&phase), "phase {phase} escaped [0, 1)");
        }
    }

    #[test]
    fn negative_frequency_wraps_backwards() {
        let params = NodeParams {
            frequency: -441.0,
            ..NodeParams::default()
        };
        let mut lfo = SignalNode::new(NodeKind::Lfo);
        lfo.process(1.0, &params, SR);
        let phase = lfo.phase().unwrap();
        assert!((phase - 0.99).abs() < 1e-4, "got {phase}");
    }

    #[test]
    fn lfo_modulates_its_input() {
        let params = NodeParams {
            frequency: 5.0,
            amplitude: 1.0,
            depth: 1.0,
        };
        let mut lfo = SignalNode::new(NodeKind::Lfo);
        let mut silent = SignalNode::new(NodeKind::Lfo);

        for _ in 0..2048 {
            let out = lfo.process(0.5, &params, SR);
            assert!((0.0..=1.0).contains(&out), "out {out} outside [0, 2 * input]");
            assert_eq!(silent.process(0.0, &params, SR), 0.0);
        }
    }

    #[test]
    fn lfo_with_zero_depth_is_transparent() {
        let params = NodeParams {
            frequency: 3.0,
            amplitude: 1.0,
            depth: 0.0,
        };
        let mut lfo = SignalNode::new(NodeKind::Lfo);
        for i in 0..256 {
            let input = (i as f32 * 0.01).sin();
            assert!((lfo.process(input, &params, SR) - input).abs() < 1e-7);
        }
    }

    #[test]
    fn output_passes_through() {
        let mut out = SignalNode::new(NodeKind::Output);
        assert_eq!(out.process(0.25, &NodeParams::default(), SR), 0.25);
        assert_eq!(out.phase(), None);
    }

    #[test]
    fn non_finite_step_resets_phase() {
        let mut osc = SignalNode::Oscillator { phase: 0.3 };
        osc.process(0.0, &NodeParams::default(), 0.0);
        assert_eq!(osc.phase(), Some(0.0));
    }

    #[test]
    fn connection_rules() {
        use NodeKind::*;
        assert!(Oscillator.can_feed(Output));
        assert!(Oscillator.can_feed(Lfo));
        assert!(Lfo.can_feed(Lfo));
        assert!(Lfo.can_feed(Output));
        assert!(!Output.can_feed(Oscillator));
        assert!(!Output.can_feed(Output));
        assert!(!Lfo.can_feed(Oscillator));
        assert!(!Oscillator.can_feed(Oscillator));
    }

    #[test]
    fn kind_round_trips_through_raw() {
        for kind in [NodeKind::Oscillator, NodeKind::Lfo, NodeKind::Output] {
            assert_eq!(NodeKind::from_raw(kind.to_raw()), Some(kind));
        }
        assert_eq!(NodeKind::from_raw(0), None);
    }
}
