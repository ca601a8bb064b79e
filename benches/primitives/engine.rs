//! Benchmarks for rendering the shared graph.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use physynth::{
    engine::{AudioEngine, EngineConfig},
    graph::{GraphEditor, NodeId, NodeKind, NodeParams},
    MAX_NODES,
};

use crate::{BUFFER_SIZES, NODE_COUNTS};

/// `count` nodes wired as osc → lfo → out chains of three.
fn chained_graph(count: usize) -> GraphEditor {
    let mut editor = GraphEditor::new(MAX_NODES);
    let chains = count / 3;
    for chain in 0..chains {
        let osc = NodeId::from_index(chain * 3);
        let lfo = NodeId::from_index(chain * 3 + 1);
        let out = NodeId::from_index(chain * 3 + 2);
        editor.activate(
            osc,
            NodeKind::Oscillator,
            NodeParams {
                frequency: 110.0 * (chain + 1) as f32,
                ..NodeParams::default()
            },
        );
        editor.activate(
            lfo,
            NodeKind::Lfo,
            NodeParams {
                frequency: 4.0,
                ..NodeParams::default()
            },
        );
        editor.activate(out, NodeKind::Output, NodeParams::default());
        editor.connect(osc, lfo);
        editor.connect(lfo, out);
    }
    editor
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives/engine");

    for &size in BUFFER_SIZES {
        let mut buffer = vec![0i16; size];

        let idle = GraphEditor::new(MAX_NODES);
        let mut engine = AudioEngine::new(EngineConfig::default(), idle.bay()).unwrap();
        group.bench_with_input(BenchmarkId::new("empty", size), &size, |b, _| {
            b.iter(|| engine.render_pcm(black_box(&mut buffer)))
        });

        for &count in NODE_COUNTS {
            let editor = chained_graph(count);
            let mut engine = AudioEngine::new(EngineConfig::default(), editor.bay()).unwrap();
            group.bench_with_input(
                BenchmarkId::new(format!("chains_{count}_nodes"), size),
                &size,
                |b, _| b.iter(|| engine.render_pcm(black_box(&mut buffer))),
            );
        }
    }

    group.finish();
}
