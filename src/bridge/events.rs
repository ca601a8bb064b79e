use crate::{graph::node::NodeKind, math::Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Select and drag.
    Primary,
    /// Connection gesture.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    SpawnOscillator,
    SpawnLfo,
    SpawnOutput,
    /// Remove the node under the pointer.
    Remove,
    /// Drop the outgoing edge of the node under the pointer.
    Disconnect,
}

impl Command {
    /// Kind created by a spawn command.
    pub fn spawn_kind(self) -> Option<NodeKind> {
        match self {
            Command::SpawnOscillator => Some(NodeKind::Oscillator),
            Command::SpawnLfo => Some(NodeKind::Lfo),
            Command::SpawnOutput => Some(NodeKind::Output),
            Command::Remove | Command::Disconnect => None,
        }
    }
}

/// Discrete input, already translated from whatever the front-end polls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved(Vec2),
    ButtonDown(Button),
    ButtonUp(Button),
    Key(Command),
}
