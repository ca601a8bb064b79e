//! Translates discrete input events into world and graph mutations.

pub mod events;

pub use events::{Button, Command, InputEvent};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use tracing::debug;

use crate::{
    graph::{
        bay::{ConnectOutcome, IgnoreReason},
        node::{NodeId, NodeKind},
    },
    math::Vec2,
    physics::config::Bounds,
    session::state::SimulationState,
};

/*
Gestures
========

  primary down      grab the body under the pointer; the world drags it
                    toward the pointer every tick
  primary up        let go and snap it to the grid

  secondary down    patch cables, in two clicks:

                      idle ──click body A──→ armed(A)
                      armed(A) ──click A──→ idle                 (cancel)
                      armed(A) ──click empty──→ idle             (cancel)
                      armed(A) ──click B, A may feed B──→ idle   (A → B)
                      armed(A) ──click B, A may not feed B──→ armed(A)

Keys spawn at the pointer. Before the pointer has been seen the position is
drawn from a seeded generator, so a scripted session places nodes the same
way every run.
*/

/// What an event did, for the front-end and for tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reaction {
    None,
    Selected(NodeId),
    Released { id: NodeId, snapped: Vec2 },
    Armed(NodeId),
    Connected { source: NodeId, target: NodeId },
    Cancelled(NodeId),
    Ignored(IgnoreReason),
    Spawned(NodeId),
    Removed(NodeId),
    Disconnected { source: NodeId, target: NodeId },
}

pub struct InteractionBridge {
    pending: Option<NodeId>,
    rng: Pcg32,
}

impl InteractionBridge {
    pub fn new(seed: u64) -> Self {
        Self {
            pending: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Source armed by a first secondary click.
    pub fn pending(&self) -> Option<NodeId> {
        self.pending
    }

    pub fn apply(&mut self, event: InputEvent, state: &mut SimulationState) -> Reaction {
        match event {
            InputEvent::PointerMoved(position) => {
                state.world_mut().set_pointer(position);
                Reaction::None
            }
            InputEvent::ButtonDown(Button::Primary) => self.grab(state),
            InputEvent::ButtonUp(Button::Primary) => self.release(state),
            InputEvent::ButtonDown(Button::Secondary) => self.patch(state),
            InputEvent::ButtonUp(Button::Secondary) => Reaction::None,
            InputEvent::Key(command) => self.command(command, state),
        }
    }

    fn grab(&mut self, state: &mut SimulationState) -> Reaction {
        let Some(pointer) = state.world().pointer() else {
            return Reaction::None;
        };
        state
            .world_mut()
            .set_selection(pointer)
            .map_or(Reaction::None, Reaction::Selected)
    }

    fn release(&mut self, state: &mut SimulationState) -> Reaction {
        let world = state.world_mut();
        let Some(id) = world.clear_selection() else {
            return Reaction::None;
        };
        let Some(snapped) = world.snap_to_grid(id) else {
            return Reaction::None;
        };
        state.sync_params();
        Reaction::Released { id, snapped }
    }

    fn patch(&mut self, state: &mut SimulationState) -> Reaction {
        let target = state
            .world()
            .pointer()
            .and_then(|pointer| state.world().body_at(pointer));

        let Some(target) = target else {
            return match self.pending.take() {
                Some(source) => {
                    debug!(%source, "connection cancelled");
                    Reaction::Cancelled(source)
                }
                None => Reaction::None,
            };
        };

        let Some(source) = self.pending else {
            self.pending = Some(target);
            debug!(source = %target, "connection armed");
            return Reaction::Armed(target);
        };

        if source == target {
            self.pending = None;
            debug!(%source, "connection cancelled");
            return Reaction::Cancelled(source);
        }

        match state.connect(source, target) {
            ConnectOutcome::Connected | ConnectOutcome::AlreadyConnected => {
                self.pending = None;
                Reaction::Connected { source, target }
            }
            ConnectOutcome::Ignored(reason) => {
                if reason == IgnoreReason::Inactive {
                    self.pending = None;
                }
                Reaction::Ignored(reason)
            }
        }
    }

    fn command(&mut self, command: Command, state: &mut SimulationState) -> Reaction {
        if let Some(kind) = command.spawn_kind() {
            return self.spawn(kind, state);
        }

        let under_pointer = state
            .world()
            .pointer()
            .and_then(|pointer| state.world().body_at(pointer));
        let Some(id) = under_pointer else {
            debug!(?command, "nothing under the pointer");
            return Reaction::None;
        };

        match command {
            Command::Remove => {
                if self.pending == Some(id) {
                    self.pending = None;
                }
                if state.remove(id) {
                    Reaction::Removed(id)
                } else {
                    Reaction::None
                }
            }
            Command::Disconnect => state
                .disconnect(id)
                .map_or(Reaction::None, |target| Reaction::Disconnected { source: id, target }),
            Command::SpawnOscillator | Command::SpawnLfo | Command::SpawnOutput => Reaction::None,
        }
    }

    fn spawn(&mut self, kind: NodeKind, state: &mut SimulationState) -> Reaction {
        let position = match state.world().pointer() {
            Some(pointer) => pointer,
            None => {
                let frame = state
                    .world()
                    .config()
                    .bounds
                    .unwrap_or(state.mapping().frame);
                let inset = state.world().config().radius();
                self.random_point(frame, inset)
            }
        };
        // A full world already logged the refusal.
        state
            .spawn(position, kind)
            .map_or(Reaction::None, Reaction::Spawned)
    }

    fn random_point(&mut self, frame: Bounds, inset: f32) -> Vec2 {
        Vec2::new(
            random_in(&mut self.rng, frame.min.x + inset, frame.max.x - inset),
            random_in(&mut self.rng, frame.min.y + inset, frame.max.y - inset),
        )
    }
}

fn random_in(rng: &mut Pcg32, low: f32, high: f32) -> f32 {
    if low < high {
        rng.gen_range(low..high)
    } else {
        (low + high) * 0.5
    }
}
