//! The application object: simulation state plus input handling, paired
//! with the audio engine that reads it.

pub mod scene;
pub mod state;

pub use scene::{BodyView, LinkView, Scene};
pub use state::SimulationState;

use crate::{
    bridge::{InputEvent, InteractionBridge, Reaction},
    config::SynthConfig,
    engine::AudioEngine,
    error::SynthResult,
};

pub struct Session {
    state: SimulationState,
    bridge: InteractionBridge,
}

impl Session {
    /// Build a session and the engine bound to its patch bay.
    ///
    /// The engine is meant to move into the audio callback; the session stays
    /// on the simulation loop.
    pub fn new(config: &SynthConfig) -> SynthResult<(Self, AudioEngine)> {
        let state = SimulationState::new(config.physics.clone(), config.mapping.clone());
        let engine = AudioEngine::new(config.engine.clone(), state.bay())?;
        let session = Self {
            state,
            bridge: InteractionBridge::new(config.seed),
        };
        Ok((session, engine))
    }

    pub fn handle(&mut self, event: InputEvent) -> Reaction {
        self.bridge.apply(event, &mut self.state)
    }

    pub fn tick(&mut self, dt: f32) {
        self.state.tick(dt);
    }

    pub fn scene(&self) -> Scene {
        Scene::capture(&self.state, self.bridge.pending())
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn bridge(&self) -> &InteractionBridge {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bridge::{Button, Command},
        graph::node::NodeKind,
        math::Vec2,
    };

    #[test]
    fn scene_reflects_gestures() {
        let (mut session, _engine) = Session::new(&SynthConfig::default()).unwrap();

        session.handle(InputEvent::PointerMoved(Vec2::new(200.0, 200.0)));
        let Reaction::Spawned(osc) = session.handle(InputEvent::Key(Command::SpawnOscillator)) else {
            panic!("expected a spawn");
        };
        session.handle(InputEvent::PointerMoved(Vec2::new(400.0, 200.0)));
        let Reaction::Spawned(out) = session.handle(InputEvent::Key(Command::SpawnOutput)) else {
            panic!("expected a spawn");
        };

        session.handle(InputEvent::PointerMoved(Vec2::new(200.0, 200.0)));
        session.handle(InputEvent::ButtonDown(Button::Secondary));
        let armed = session.scene();
        assert!(armed.body(osc).unwrap().pending);
        assert!(!armed.body(out).unwrap().pending);

        session.handle(InputEvent::PointerMoved(Vec2::new(400.0, 200.0)));
        session.handle(InputEvent::ButtonDown(Button::Secondary));
        let scene = session.scene();
        assert_eq!(scene.bodies.len(), 2);
        assert_eq!(scene.links.len(), 1);
        let link = scene.links[0];
        assert_eq!((link.from, link.to), (osc, out));
        assert_eq!(link.from_pos, Vec2::new(200.0, 200.0));
        assert_eq!(link.to_pos, Vec2::new(400.0, 200.0));
        assert!(scene.bodies.iter().all(|body| !body.pending));

        session.handle(InputEvent::ButtonDown(Button::Primary));
        assert!(session.scene().body(out).unwrap().selected);
        assert_eq!(session.state().world().kind(out), Some(NodeKind::Output));
    }

    #[test]
    fn invalid_engine_config_fails_session() {
        let mut config = SynthConfig::default();
        config.engine.sample_rate = 0;
        assert!(Session::new(&config).is_err());
    }
}
