//! Benchmarks for the drone engine.
//!
//! Run with: cargo bench
//!
//! Everything here must finish well inside real-time audio deadlines.
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use tanpura_dsp::engine::{EngineConfig, TanpuraEngine};
use tanpura_dsp::graph::DroneGraph;
use tanpura_dsp::voice::PluckVoice;

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("voice/render");

    for &size in BLOCK_SIZES {
        let mut voice = PluckVoice::new(220.0, 0.8, SAMPLE_RATE);
        let mut buffer = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("pluck", size), &size, |b, _| {
            b.iter(|| {
                voice.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/render");

    for &size in BLOCK_SIZES {
        // Four strings ringing with the echo loop engaged.
        let mut graph = DroneGraph::new(SAMPLE_RATE, 0.5, 0.5);
        for multiplier in [1.0, 1.5, 2.0, 2.0] {
            graph.spawn(PluckVoice::new(130.8 * multiplier, 0.8, SAMPLE_RATE));
        }
        let mut buffer = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("four_voices", size), &size, |b, _| {
            b.iter(|| {
                graph.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/render_block");

    for &size in BLOCK_SIZES {
        let (mut engine, mut handle) = TanpuraEngine::new(SAMPLE_RATE);
        handle.set_config(EngineConfig {
            is_playing: true,
            echo_level: 0.5,
            ..EngineConfig::default()
        });
        let mut buffer = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("playing", size), &size, |b, _| {
            b.iter(|| {
                engine.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_voice, bench_graph, bench_engine);
criterion_main!(benches);
