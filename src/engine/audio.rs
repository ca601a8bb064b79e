use std::sync::Arc;

use cpal::{FromSample, SizedSample};

#[cfg(feature = "rtrb")]
use rtrb::Producer;

use crate::{
    engine::{config::EngineConfig, pcm::to_pcm},
    error::SynthResult,
    graph::{
        bay::PatchBay,
        node::{NodeId, NodeKind, SignalNode},
    },
};

/*
Audio Engine
============

The engine runs inside the audio driver's callback. It owns the DSP state
of every node (phases) and reads everything else from the shared patch bay.

Per sample:

    for each Output slot:
        walk upstream through `incoming` links, collecting the chain
        run the chain from its far end toward the output:

            [osc] ──process──→ [lfo] ──process──→ [lfo] ──process──→ [out]
             0.0 in             x in               x in               x in

    mix = sum over connected outputs / number of connected outputs
    clamp to [-1, 1]

Only chains whose far end is an Oscillator count. An Output without an
incoming link, or fed by LFOs with no Oscillator behind them, is skipped and
does not count toward the divisor, so it never dilutes the audible outputs.
Nodes on a skipped chain do not advance. With no counted output at all the
engine emits silence.

Realtime Rules
--------------

- No locks: every read of the patch bay is a single atomic load.
- No allocation: the chain scratch buffer and node states are sized to the
  bay's capacity up front.
- No logging from the render path.
- Links are re-read every sample, so a disconnect is heard on the very next
  sample after it becomes visible.
*/

pub struct AudioEngine {
    config: EngineConfig,
    sample_rate: f32,
    bay: Arc<PatchBay>,
    nodes: Box<[SignalNode]>,
    generations: Box<[u32]>,
    chain: Box<[NodeId]>,
    sample_clock: u64,
    #[cfg(feature = "rtrb")]
    scope: Option<Producer<f32>>,
}

impl AudioEngine {
    pub fn new(config: EngineConfig, bay: Arc<PatchBay>) -> SynthResult<Self> {
        config.validate()?;
        let capacity = bay.capacity();
        Ok(Self {
            sample_rate: config.sample_rate as f32,
            config,
            bay,
            nodes: vec![SignalNode::Output; capacity].into_boxed_slice(),
            generations: vec![0; capacity].into_boxed_slice(),
            chain: vec![NodeId::from_index(0); capacity].into_boxed_slice(),
            sample_clock: 0,
            #[cfg(feature = "rtrb")]
            scope: None,
        })
    }

    /// Copy every rendered sample into `producer`. Samples are dropped while
    /// the ring is full.
    #[cfg(feature = "rtrb")]
    pub fn with_scope(mut self, producer: Producer<f32>) -> Self {
        self.scope = Some(producer);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Follow the rate the device actually runs at.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        if sample_rate > 0 {
            self.config.sample_rate = sample_rate;
            self.sample_rate = sample_rate as f32;
        }
    }

    /// Samples rendered since creation or the last `reset`.
    pub fn sample_clock(&self) -> u64 {
        self.sample_clock
    }

    pub fn bay(&self) -> &Arc<PatchBay> {
        &self.bay
    }

    /// Phase of the node in slot `id`, as last rendered.
    pub fn phase(&self, id: NodeId) -> Option<f32> {
        self.nodes.get(id.index())?.phase()
    }

    /// Restart every phase and the sample clock.
    pub fn reset(&mut self) {
        for node in self.nodes.iter_mut() {
            node.reset();
        }
        self.sample_clock = 0;
        self.bay.publish_frames(0);
    }

    /// Render one mono sample in [-1, 1].
    pub fn next_sample(&mut self) -> f32 {
        let mut sum = 0.0;
        let mut connected = 0u32;

        for index in 0..self.bay.capacity() {
            let id = NodeId::from_index(index);
            if self.bay.kind(id) != Some(NodeKind::Output) {
                continue;
            }
            if let Some(value) = self.evaluate(id) {
                sum += value;
                connected += 1;
            }
        }

        self.sample_clock += 1;

        if connected == 0 {
            return 0.0;
        }
        let mixed = sum / connected as f32;
        if mixed.is_finite() {
            mixed.clamp(-1.0, 1.0)
        } else {
            0.0
        }
    }

    /// Fill `out` with mono float samples.
    pub fn render_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
            self.tap(*sample);
        }
        self.bay.publish_frames(self.sample_clock);
    }

    /// Fill `out` with mono 16-bit PCM.
    pub fn render_pcm(&mut self, out: &mut [i16]) {
        for sample in out.iter_mut() {
            let value = self.next_sample();
            self.tap(value);
            *sample = to_pcm(value);
        }
        self.bay.publish_frames(self.sample_clock);
    }

    /// Fill an interleaved device buffer, duplicating the mono signal to
    /// every channel. The signal is quantized to 16-bit first whatever the
    /// device format.
    pub fn render_interleaved<T>(&mut self, data: &mut [T], channels: usize)
    where
        T: SizedSample + FromSample<i16>,
    {
        let channels = channels.max(1);
        for frame in data.chunks_mut(channels) {
            let value = self.next_sample();
            self.tap(value);
            frame.fill(T::from_sample(to_pcm(value)));
        }
        self.bay.publish_frames(self.sample_clock);
    }

    #[cfg(feature = "rtrb")]
    #[inline]
    fn tap(&mut self, sample: f32) {
        if let Some(scope) = self.scope.as_mut() {
            let _ = scope.push(sample);
        }
    }

    #[cfg(not(feature = "rtrb"))]
    #[inline]
    fn tap(&mut self, _sample: f32) {}

    /// Value arriving at `output`, or `None` if nothing feeds it.
    fn evaluate(&mut self, output: NodeId) -> Option<f32> {
        let Self {
            bay,
            nodes,
            generations,
            chain,
            sample_rate,
            ..
        } = self;

        let mut len = 0;
        let mut far_end = None;
        let mut cursor = bay.upstream(output);
        while let Some(id) = cursor {
            if len == chain.len() {
                break;
            }
            let Some(kind) = bay.kind(id) else {
                // Removed between the link load and now.
                break;
            };
            chain[len] = id;
            len += 1;
            far_end = Some(kind);
            cursor = bay.upstream(id);
        }
        if far_end != Some(NodeKind::Oscillator) {
            return None;
        }

        let mut value = 0.0;
        for &id in chain[..len].iter().rev() {
            let node = sync_node(bay, nodes, generations, id)?;
            value = node.process(value, &bay.params(id), *sample_rate);
        }

        let out = sync_node(bay, nodes, generations, output)?;
        Some(out.process(value, &bay.params(output), *sample_rate))
    }
}

/// DSP state for slot `id`, rebuilt if the slot was re-activated since the
/// last visit.
#[inline]
fn sync_node<'a>(
    bay: &PatchBay,
    nodes: &'a mut [SignalNode],
    generations: &mut [u32],
    id: NodeId,
) -> Option<&'a mut SignalNode> {
    let kind = bay.kind(id)?;
    let generation = bay.generation(id);
    let index = id.index();
    let node = nodes.get_mut(index)?;
    let seen = generations.get_mut(index)?;
    if *seen != generation || node.kind() != kind {
        *node = SignalNode::new(kind);
        *seen = generation;
    }
    Some(node)
}
