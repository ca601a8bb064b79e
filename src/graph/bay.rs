use std::sync::{
    atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering},
    Arc,
};

use tracing::debug;

use crate::graph::{
    atomic::AtomicF32,
    node::{NodeId, NodeKind, NodeParams},
};

/*
Patch Bay
=========

The patch bay is the only state shared between the simulation loop and the
audio callback. It is a fixed table of slots, allocated once and never
resized, so the audio side can index it without a lock:

    slot   kind   gen   freq    amp   depth   incoming   outgoing
    ────   ────   ───   ─────   ───   ─────   ────────   ────────
    #0     osc    1     220.0   0.8   -       -          #1
    #1     out    1     -       -     -       #0         -
    #2     empty  3     ...

Every field is its own atomic word. A write is one store, a read is one
load, and that is the whole critical section. The audio side never waits
and may see a value that is one frame stale.

Links
-----

Edges are stored twice: `outgoing` on the source and `incoming` on the
target. The audio engine only ever reads `incoming`, walking from each
Output back toward its source. That single word is the commit point:

    connect(a → b)      a.outgoing = b; then b.incoming = a   (commit)
    disconnect(a → b)   b.incoming = -  (commit); then a.outgoing = -

so a walk either sees the whole edge or none of it.

`kind` is published with Release after a slot's parameters and links are
written, and read with Acquire. The `incoming` link is stored and loaded the
same way, so a reader that follows a link sees an initialised slot.

Single Writer
-------------

All stores go through `GraphEditor`, which is not `Clone` and lives on the
simulation side. The audio side holds `Arc<PatchBay>`, which only exposes
loads.

Generations
-----------

Removing a node empties its slot, and a later spawn may reuse the index.
Each activation bumps the slot's generation, which lets the audio side tell
a fresh node from a stale one and restart its phase.
*/

const EMPTY: u8 = 0;
const NO_LINK: u32 = u32::MAX;

/// One entry of the shared node table.
#[derive(Debug)]
pub struct NodeSlot {
    kind: AtomicU8,
    generation: AtomicU32,
    frequency: AtomicF32,
    amplitude: AtomicF32,
    depth: AtomicF32,
    incoming: AtomicU32,
    outgoing: AtomicU32,
}

impl NodeSlot {
    fn new() -> Self {
        Self {
            kind: AtomicU8::new(EMPTY),
            generation: AtomicU32::new(0),
            frequency: AtomicF32::new(0.0),
            amplitude: AtomicF32::new(0.0),
            depth: AtomicF32::new(0.0),
            incoming: AtomicU32::new(NO_LINK),
            outgoing: AtomicU32::new(NO_LINK),
        }
    }
}

#[inline]
fn decode_link(raw: u32) -> Option<NodeId> {
    (raw != NO_LINK).then(|| NodeId::from_index(raw as usize))
}

#[inline]
fn encode_link(link: Option<NodeId>) -> u32 {
    link.map_or(NO_LINK, NodeId::raw)
}

/// Fixed-capacity table of node parameters and topology.
#[derive(Debug)]
pub struct PatchBay {
    slots: Box<[NodeSlot]>,
    frames_rendered: AtomicU64,
}

impl PatchBay {
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| NodeSlot::new()).collect(),
            frames_rendered: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Kind of the node in slot `id`, or `None` for an empty or out-of-range slot.
    #[inline]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        let slot = self.slots.get(id.index())?;
        NodeKind::from_raw(slot.kind.load(Ordering::Acquire))
    }

    #[inline]
    pub fn generation(&self, id: NodeId) -> u32 {
        self.slots
            .get(id.index())
            .map_or(0, |slot| slot.generation.load(Ordering::Relaxed))
    }

    #[inline]
    pub fn params(&self, id: NodeId) -> NodeParams {
        match self.slots.get(id.index()) {
            Some(slot) => NodeParams {
                frequency: slot.frequency.get(),
                amplitude: slot.amplitude.get(),
                depth: slot.depth.get(),
            },
            None => NodeParams::default(),
        }
    }

    /// The node feeding `id`, if any.
    #[inline]
    pub fn upstream(&self, id: NodeId) -> Option<NodeId> {
        let slot = self.slots.get(id.index())?;
        decode_link(slot.incoming.load(Ordering::Acquire))
    }

    /// The node `id` feeds, if any.
    #[inline]
    pub fn downstream(&self, id: NodeId) -> Option<NodeId> {
        let slot = self.slots.get(id.index())?;
        decode_link(slot.outgoing.load(Ordering::Relaxed))
    }

    /// Samples rendered by the engine so far, as last published.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered.load(Ordering::Relaxed)
    }

    pub(crate) fn publish_frames(&self, frames: u64) {
        self.frames_rendered.store(frames, Ordering::Relaxed);
    }
}

/// Why a connect request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    SelfLink,
    /// One of the endpoints is not an active node.
    Inactive,
    Incompatible { source: NodeKind, target: NodeKind },
    /// The edge would close a loop.
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected,
    AlreadyConnected,
    Ignored(IgnoreReason),
}

/// The single writer of a `PatchBay`.
#[derive(Debug)]
pub struct GraphEditor {
    bay: Arc<PatchBay>,
}

impl GraphEditor {
    pub fn new(capacity: usize) -> Self {
        Self {
            bay: Arc::new(PatchBay::new(capacity)),
        }
    }

    /// Read handle for the audio side.
    pub fn bay(&self) -> Arc<PatchBay> {
        Arc::clone(&self.bay)
    }

    pub fn capacity(&self) -> usize {
        self.bay.capacity()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.bay.kind(id)
    }

    pub fn params(&self, id: NodeId) -> NodeParams {
        self.bay.params(id)
    }

    pub fn outgoing(&self, id: NodeId) -> Option<NodeId> {
        self.bay.downstream(id)
    }

    pub fn incoming(&self, id: NodeId) -> Option<NodeId> {
        self.bay.upstream(id)
    }

    /// Every edge as `(source, target)`.
    pub fn links(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        (0..self.capacity()).filter_map(move |index| {
            let source = NodeId::from_index(index);
            self.bay.kind(source)?;
            self.outgoing(source).map(|target| (source, target))
        })
    }

    /// Publish a new node in slot `id`.
    pub fn activate(&mut self, id: NodeId, kind: NodeKind, params: NodeParams) {
        let Some(slot) = self.bay.slots.get(id.index()) else {
            return;
        };
        debug_assert!(
            self.bay.kind(id).is_none(),
            "activating occupied slot {id}"
        );
        slot.frequency.set(params.frequency);
        slot.amplitude.set(params.amplitude);
        slot.depth.set(params.depth);
        slot.incoming.store(NO_LINK, Ordering::Relaxed);
        slot.outgoing.store(NO_LINK, Ordering::Relaxed);
        slot.generation.fetch_add(1, Ordering::Relaxed);
        slot.kind.store(kind.to_raw(), Ordering::Release);
    }

    /// Detach every edge touching `id` and empty its slot.
    pub fn deactivate(&mut self, id: NodeId) {
        if self.bay.kind(id).is_none() {
            return;
        }
        self.disconnect(id);
        if let Some(source) = self.incoming(id) {
            self.disconnect(source);
        }
        if let Some(slot) = self.bay.slots.get(id.index()) {
            slot.kind.store(EMPTY, Ordering::Release);
        }
    }

    /// Best-effort parameter update; the audio side sees it on its next read.
    pub fn set_params(&mut self, id: NodeId, params: NodeParams) {
        if let Some(slot) = self.bay.slots.get(id.index()) {
            slot.frequency.set(params.frequency);
            slot.amplitude.set(params.amplitude);
            slot.depth.set(params.depth);
        }
    }

    /// Add the edge `source → target`.
    ///
    /// A source keeps at most one outgoing edge and a target at most one
    /// incoming edge: any edge already leaving `source` or entering `target`
    /// is removed first.
    pub fn connect(&mut self, source: NodeId, target: NodeId) -> ConnectOutcome {
        let outcome = self.check_connect(source, target);
        if outcome != ConnectOutcome::Connected {
            debug!(%source, %target, ?outcome, "connect skipped");
            return outcome;
        }

        self.disconnect(source);
        if let Some(previous) = self.incoming(target) {
            self.disconnect(previous);
        }

        let slots = &self.bay.slots;
        slots[source.index()]
            .outgoing
            .store(target.raw(), Ordering::Relaxed);
        slots[target.index()]
            .incoming
            .store(encode_link(Some(source)), Ordering::Release);

        debug!(%source, %target, "connected");
        ConnectOutcome::Connected
    }

    /// Remove the edge leaving `source`. Returns its former target.
    pub fn disconnect(&mut self, source: NodeId) -> Option<NodeId> {
        let target = self.outgoing(source)?;
        let slots = &self.bay.slots;
        if let Some(target_slot) = slots.get(target.index()) {
            if target_slot.incoming.load(Ordering::Relaxed) == source.raw() {
                target_slot.incoming.store(NO_LINK, Ordering::Release);
            }
        }
        slots[source.index()]
            .outgoing
            .store(NO_LINK, Ordering::Relaxed);

        debug!(%source, %target, "disconnected");
        Some(target)
    }

    fn check_connect(&self, source: NodeId, target: NodeId) -> ConnectOutcome {
        if source == target {
            return ConnectOutcome::Ignored(IgnoreReason::SelfLink);
        }
        let (Some(source_kind), Some(target_kind)) = (self.kind(source), self.kind(target)) else {
            return ConnectOutcome::Ignored(IgnoreReason::Inactive);
        };
        if !source_kind.can_feed(target_kind) {
            return ConnectOutcome::Ignored(IgnoreReason::Incompatible {
                source: source_kind,
                target: target_kind,
            });
        }
        if self.outgoing(source) == Some(target) {
            return ConnectOutcome::AlreadyConnected;
        }
        if self.reaches(target, source) {
            return ConnectOutcome::Ignored(IgnoreReason::Cycle);
        }
        ConnectOutcome::Connected
    }

    /// Whether following outgoing edges from `from` arrives at `to`.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut cursor = Some(from);
        for _ in 0..self.capacity() {
            match cursor {
                Some(id) if id == to => return true,
                Some(id) => cursor = self.outgoing(id),
                None => return false,
            }
        }
        false
    }
}
