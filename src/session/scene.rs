use crate::{
    graph::node::{NodeId, NodeKind},
    math::Vec2,
    session::state::SimulationState,
};

/// One body as the front-end should draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyView {
    pub id: NodeId,
    pub position: Vec2,
    pub kind: NodeKind,
    pub selected: bool,
    /// Armed as the source of a connection gesture.
    pub pending: bool,
}

/// One edge, with both endpoint positions resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkView {
    pub from: NodeId,
    pub to: NodeId,
    pub from_pos: Vec2,
    pub to_pos: Vec2,
}

/// Snapshot of everything visible after a tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub bodies: Vec<BodyView>,
    pub links: Vec<LinkView>,
}

impl Scene {
    pub fn capture(state: &SimulationState, pending: Option<NodeId>) -> Self {
        let world = state.world();
        let selected = world.selected();

        let bodies = world
            .iter()
            .map(|(id, entity)| BodyView {
                id,
                position: entity.body.position(),
                kind: entity.kind,
                selected: selected == Some(id),
                pending: pending == Some(id),
            })
            .collect();

        let links = state
            .editor()
            .links()
            .filter_map(|(from, to)| {
                Some(LinkView {
                    from,
                    to,
                    from_pos: world.body(from)?.position(),
                    to_pos: world.body(to)?.position(),
                })
            })
            .collect();

        Self { bodies, links }
    }

    pub fn body(&self, id: NodeId) -> Option<&BodyView> {
        self.bodies.iter().find(|body| body.id == id)
    }
}
