//! Benchmarks for one simulation frame of a patched session.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use physynth::{
    bridge::{Button, Command, InputEvent},
    math::Vec2,
    Session, SynthConfig,
};

use crate::NODE_COUNTS;

/// A session with `count` bodies spawned on a grid and patched in pairs.
fn patched_session(count: usize) -> Session {
    let (mut session, _engine) = Session::new(&SynthConfig::default()).unwrap();
    let at = |i: usize| Vec2::new(50.0 + (i % 10) as f32 * 70.0, 50.0 + (i / 10) as f32 * 70.0);

    for i in 0..count {
        let command = if i % 2 == 0 {
            Command::SpawnOscillator
        } else {
            Command::SpawnOutput
        };
        session.handle(InputEvent::PointerMoved(at(i)));
        session.handle(InputEvent::Key(command));
    }
    for i in (0..count.saturating_sub(1)).step_by(2) {
        for position in [at(i), at(i + 1)] {
            session.handle(InputEvent::PointerMoved(position));
            session.handle(InputEvent::ButtonDown(Button::Secondary));
        }
    }
    session
}

pub fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/frame");

    for &count in NODE_COUNTS {
        let mut session = patched_session(count);
        group.bench_with_input(BenchmarkId::new("tick_and_scene", count), &count, |b, _| {
            b.iter(|| {
                session.tick(black_box(1.0 / 60.0));
                black_box(session.scene())
            })
        });
    }

    group.finish();
}
