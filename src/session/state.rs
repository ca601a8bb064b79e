use std::sync::Arc;

use crate::{
    error::SynthResult,
    graph::{
        bay::{ConnectOutcome, GraphEditor, PatchBay},
        mapping::ParamMapping,
        node::{NodeId, NodeKind, NodeParams},
    },
    math::Vec2,
    physics::{config::PhysicsConfig, world::PhysicsWorld},
    MAX_NODES,
};

/// Everything the simulation loop owns: bodies, the graph writer, and the
/// mapping between them.
///
/// A `NodeId` names the same slot in the world and in the patch bay, so
/// every structural change goes through here to keep the two in step.
pub struct SimulationState {
    world: PhysicsWorld,
    editor: GraphEditor,
    mapping: ParamMapping,
}

impl SimulationState {
    pub fn new(physics: PhysicsConfig, mapping: ParamMapping) -> Self {
        Self {
            world: PhysicsWorld::with_capacity(physics, MAX_NODES),
            editor: GraphEditor::new(MAX_NODES),
            mapping,
        }
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn editor(&self) -> &GraphEditor {
        &self.editor
    }

    pub fn mapping(&self) -> &ParamMapping {
        &self.mapping
    }

    /// Read handle for an `AudioEngine`.
    pub fn bay(&self) -> Arc<PatchBay> {
        self.editor.bay()
    }

    pub fn spawn(&mut self, position: Vec2, kind: NodeKind) -> SynthResult<NodeId> {
        let id = self.world.spawn(position, kind)?;
        let params = self.mapping.params_for(kind, position, None);
        self.editor.activate(id, kind, params);
        Ok(id)
    }

    /// Remove `id` from the graph, then from the world.
    pub fn remove(&mut self, id: NodeId) -> bool {
        self.editor.deactivate(id);
        self.world.remove(id).is_some()
    }

    pub fn connect(&mut self, source: NodeId, target: NodeId) -> ConnectOutcome {
        let outcome = self.editor.connect(source, target);
        if outcome == ConnectOutcome::Connected {
            self.publish(source);
        }
        outcome
    }

    pub fn disconnect(&mut self, source: NodeId) -> Option<NodeId> {
        let target = self.editor.disconnect(source)?;
        self.publish(source);
        Some(target)
    }

    /// One visual frame: step the bodies, then republish every parameter.
    pub fn tick(&mut self, dt: f32) {
        self.world.tick(dt);
        self.sync_params();
    }

    /// Write the mapped parameters of every body to the patch bay.
    pub fn sync_params(&mut self) {
        let Self {
            world,
            editor,
            mapping,
        } = self;
        let world = &*world;
        for (id, _) in world.iter() {
            if let Some(params) = mapped_params(world, editor, mapping, id) {
                editor.set_params(id, params);
            }
        }
    }

    /// Parameters `id` would be given at its current position.
    pub fn params_for(&self, id: NodeId) -> Option<NodeParams> {
        mapped_params(&self.world, &self.editor, &self.mapping, id)
    }

    fn publish(&mut self, id: NodeId) {
        if let Some(params) = self.params_for(id) {
            self.editor.set_params(id, params);
        }
    }
}

fn mapped_params(
    world: &PhysicsWorld,
    editor: &GraphEditor,
    mapping: &ParamMapping,
    id: NodeId,
) -> Option<NodeParams> {
    let entity = world.get(id)?;
    let position = entity.body.position();
    let spacing = editor
        .outgoing(id)
        .and_then(|target| world.body(target))
        .map(|target| target.position().distance(position));
    Some(mapping.params_for(entity.kind, position, spacing))
}
