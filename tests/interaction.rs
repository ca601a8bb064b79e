use physynth::{
    bridge::{Button, Command, InputEvent, Reaction},
    graph::{IgnoreReason, NodeId, NodeKind},
    math::Vec2,
    Session, SynthConfig,
};

fn session() -> Session {
    Session::new(&SynthConfig::default()).unwrap().0
}

fn move_to(session: &mut Session, at: Vec2) {
    session.handle(InputEvent::PointerMoved(at));
}

fn spawn(session: &mut Session, at: Vec2, command: Command) -> NodeId {
    move_to(session, at);
    match session.handle(InputEvent::Key(command)) {
        Reaction::Spawned(id) => id,
        other => panic!("expected a spawn, got {other:?}"),
    }
}

fn right_click(session: &mut Session, at: Vec2) -> Reaction {
    move_to(session, at);
    session.handle(InputEvent::ButtonDown(Button::Secondary))
}

#[test]
fn drag_and_release_snaps_to_grid() {
    let mut session = session();
    let id = spawn(&mut session, Vec2::new(100.0, 100.0), Command::SpawnOscillator);

    assert_eq!(
        session.handle(InputEvent::ButtonDown(Button::Primary)),
        Reaction::Selected(id)
    );
    move_to(&mut session, Vec2::new(330.0, 250.0));
    for _ in 0..240 {
        session.tick(1.0 / 60.0);
    }

    let Reaction::Released { id: released, snapped } =
        session.handle(InputEvent::ButtonUp(Button::Primary))
    else {
        panic!("expected a release");
    };
    assert_eq!(released, id);
    assert_eq!(snapped.x % 40.0, 0.0);
    assert_eq!(snapped.y % 40.0, 0.0);
    assert!(snapped.distance(Vec2::new(330.0, 250.0)) < 60.0, "snapped to {snapped:?}");

    let state = session.state();
    let body = state.world().body(id).unwrap();
    assert_eq!(body.position(), snapped);
    assert_eq!(body.velocity(), Vec2::ZERO);
    assert_eq!(state.world().selected(), None);

    let expected = state.mapping().frequency_at(NodeKind::Oscillator, snapped.y);
    assert!((state.editor().params(id).frequency - expected).abs() < 1e-3);
}

#[test]
fn drag_does_not_hop_to_neighbours() {
    let mut session = session();
    let first = spawn(&mut session, Vec2::new(100.0, 300.0), Command::SpawnOscillator);
    spawn(&mut session, Vec2::new(300.0, 300.0), Command::SpawnOscillator);

    move_to(&mut session, Vec2::new(100.0, 300.0));
    session.handle(InputEvent::ButtonDown(Button::Primary));
    move_to(&mut session, Vec2::new(300.0, 300.0));
    session.handle(InputEvent::ButtonDown(Button::Primary));

    assert_eq!(session.state().world().selected(), Some(first));
}

#[test]
fn two_clicks_patch_a_chain() {
    let mut session = session();
    let osc_at = Vec2::new(100.0, 100.0);
    let lfo_at = Vec2::new(250.0, 100.0);
    let out_at = Vec2::new(400.0, 100.0);
    let osc = spawn(&mut session, osc_at, Command::SpawnOscillator);
    let lfo = spawn(&mut session, lfo_at, Command::SpawnLfo);
    let out = spawn(&mut session, out_at, Command::SpawnOutput);

    assert_eq!(right_click(&mut session, osc_at), Reaction::Armed(osc));
    assert_eq!(session.bridge().pending(), Some(osc));
    assert_eq!(
        right_click(&mut session, lfo_at),
        Reaction::Connected {
            source: osc,
            target: lfo
        }
    );
    assert_eq!(session.bridge().pending(), None);

    right_click(&mut session, lfo_at);
    right_click(&mut session, out_at);

    let scene = session.scene();
    let mut links: Vec<_> = scene.links.iter().map(|l| (l.from, l.to)).collect();
    links.sort();
    assert_eq!(links, vec![(osc, lfo), (lfo, out)]);
}

#[test]
fn reclicking_the_source_cancels() {
    let mut session = session();
    let at = Vec2::new(200.0, 200.0);
    let osc = spawn(&mut session, at, Command::SpawnOscillator);

    right_click(&mut session, at);
    assert_eq!(right_click(&mut session, at), Reaction::Cancelled(osc));
    assert_eq!(session.bridge().pending(), None);
    assert!(session.scene().links.is_empty());
}

#[test]
fn cycle_is_refused_and_source_stays_armed() {
    let mut session = session();
    let a_at = Vec2::new(100.0, 200.0);
    let b_at = Vec2::new(300.0, 200.0);
    let a = spawn(&mut session, a_at, Command::SpawnLfo);
    let b = spawn(&mut session, b_at, Command::SpawnLfo);

    right_click(&mut session, a_at);
    right_click(&mut session, b_at);

    assert_eq!(right_click(&mut session, b_at), Reaction::Armed(b));
    assert_eq!(
        right_click(&mut session, a_at),
        Reaction::Ignored(IgnoreReason::Cycle)
    );
    assert_eq!(session.bridge().pending(), Some(b));
    assert_eq!(session.state().editor().outgoing(b), None);
    assert_eq!(session.state().editor().outgoing(a), Some(b));
}

#[test]
fn second_source_takes_over_the_target() {
    let mut session = session();
    let first_at = Vec2::new(100.0, 100.0);
    let second_at = Vec2::new(100.0, 300.0);
    let out_at = Vec2::new(300.0, 200.0);
    let first = spawn(&mut session, first_at, Command::SpawnOscillator);
    let second = spawn(&mut session, second_at, Command::SpawnOscillator);
    let out = spawn(&mut session, out_at, Command::SpawnOutput);

    right_click(&mut session, first_at);
    right_click(&mut session, out_at);
    right_click(&mut session, second_at);
    right_click(&mut session, out_at);

    let editor = session.state().editor();
    assert_eq!(editor.incoming(out), Some(second));
    assert_eq!(editor.outgoing(first), None);
}

#[test]
fn remove_detaches_and_frees_the_slot() {
    let mut session = session();
    let osc_at = Vec2::new(100.0, 100.0);
    let out_at = Vec2::new(300.0, 100.0);
    let osc = spawn(&mut session, osc_at, Command::SpawnOscillator);
    let out = spawn(&mut session, out_at, Command::SpawnOutput);
    right_click(&mut session, osc_at);
    right_click(&mut session, out_at);

    move_to(&mut session, out_at);
    assert_eq!(
        session.handle(InputEvent::Key(Command::Remove)),
        Reaction::Removed(out)
    );
    assert_eq!(session.state().editor().outgoing(osc), None);
    assert!(session.scene().links.is_empty());

    // The freed slot is reused for the next node.
    let again = spawn(&mut session, Vec2::new(500.0, 300.0), Command::SpawnLfo);
    assert_eq!(again, out);
    assert_eq!(session.state().editor().kind(again), Some(NodeKind::Lfo));
}
