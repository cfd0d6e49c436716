//! Playback behavior through the public engine handle only.

use tanpura_dsp::engine::{EngineConfig, EngineHandle, TanpuraEngine};
use tanpura_dsp::tuning::StringId;
use tanpura_dsp::tuning::StringId::{Pa, Sa, Sa1, Sa2};

const SAMPLE_RATE: f32 = 1_000.0;
const BLOCK: usize = 50;

fn playing_config(tempo: f32, pluck_delay_ms: f32) -> EngineConfig {
    EngineConfig {
        is_playing: true,
        tempo,
        pluck_delay_ms,
        ..EngineConfig::default()
    }
}

/// Render `blocks` blocks, recording which block each pluck landed in.
fn run_blocks(
    engine: &mut TanpuraEngine,
    handle: &mut EngineHandle,
    blocks: usize,
) -> (Vec<(usize, StringId)>, Vec<f32>) {
    let mut plucks = Vec::new();
    let mut samples = Vec::new();
    let mut out = vec![0.0f32; BLOCK];

    for block in 0..blocks {
        engine.render_block(&mut out);
        samples.extend_from_slice(&out);
        while let Some(event) = handle.poll_pluck() {
            plucks.push((block, event.string));
        }
    }

    (plucks, samples)
}

#[test]
fn rotation_is_cyclic_and_ordered() {
    let (mut engine, mut handle) = TanpuraEngine::new(SAMPLE_RATE);
    handle.set_config(playing_config(60.0, 100.0));

    let (plucks, samples) = run_blocks(&mut engine, &mut handle, 45);

    let order: Vec<StringId> = plucks.iter().map(|&(_, s)| s).collect();
    assert_eq!(
        &order[..8],
        &[Pa, Sa1, Sa2, Sa, Pa, Sa1, Sa2, Sa],
        "two full cycles in fixed order"
    );

    assert!(samples.iter().any(|s| s.abs() > 0.0));
    assert!(samples.iter().all(|s| s.is_finite()));
}

#[test]
fn feasible_cycle_spacing_matches_tempo() {
    let (mut engine, mut handle) = TanpuraEngine::new(SAMPLE_RATE);
    // 60 cpm -> 1000 ms cycle; gaps 100/100/100/700.
    handle.set_config(playing_config(60.0, 100.0));

    let (plucks, _) = run_blocks(&mut engine, &mut handle, 30);

    // Block size is 50 ms: plucks land in blocks 0, 2, 4, 6, then 20.
    let blocks: Vec<usize> = plucks.iter().map(|&(b, _)| b).collect();
    assert_eq!(&blocks[..5], &[0, 2, 4, 6, 20]);
}

#[test]
fn degraded_mode_uses_the_pluck_delay_throughout() {
    let (mut engine, mut handle) = TanpuraEngine::new(SAMPLE_RATE);
    // tempo 80 -> 750 ms cycle, but 3 x 250 ms fills it, so every gap is
    // 250 ms and the cycle stretches to 1000 ms.
    handle.set_config(playing_config(80.0, 250.0));

    let (plucks, _) = run_blocks(&mut engine, &mut handle, 30);

    let blocks: Vec<usize> = plucks.iter().map(|&(b, _)| b).collect();
    assert_eq!(&blocks[..5], &[0, 5, 10, 15, 20]);

    let order: Vec<StringId> = plucks.iter().map(|&(_, s)| s).collect();
    assert_eq!(&order[..5], &[Pa, Sa1, Sa2, Sa, Pa]);
}

#[test]
fn restart_always_reopens_on_the_fifth() {
    let (mut engine, mut handle) = TanpuraEngine::new(SAMPLE_RATE);
    handle.set_config(playing_config(60.0, 100.0));

    // Stop mid-cycle, twice, at different positions.
    for blocks_before_stop in [3, 5] {
        let (plucks, _) = run_blocks(&mut engine, &mut handle, blocks_before_stop);
        assert!(!plucks.is_empty());

        handle.set_config(EngineConfig {
            is_playing: false,
            ..playing_config(60.0, 100.0)
        });
        let (plucks, _) = run_blocks(&mut engine, &mut handle, 5);
        assert!(plucks.is_empty(), "stopped engine must not pluck");

        handle.set_config(playing_config(60.0, 100.0));
        let (plucks, _) = run_blocks(&mut engine, &mut handle, 1);
        assert_eq!(plucks.first().map(|&(_, s)| s), Some(Pa));
    }
}

#[test]
fn silence_before_play_and_sound_after() {
    let (mut engine, mut handle) = TanpuraEngine::new(SAMPLE_RATE);

    let (plucks, samples) = run_blocks(&mut engine, &mut handle, 10);
    assert!(plucks.is_empty());
    assert!(samples.iter().all(|&s| s == 0.0));

    handle.set_config(playing_config(60.0, 100.0));
    let (plucks, samples) = run_blocks(&mut engine, &mut handle, 10);
    assert!(!plucks.is_empty());
    assert!(samples.iter().any(|s| s.abs() > 0.0));
}

#[test]
fn echo_extends_the_tail() {
    // Pluck once and stop feeding the graph; with echo engaged the energy
    // 500 ms later must exceed the echo-free rendition.
    let tail_energy = |echo_level: f32| -> f32 {
        let (mut engine, mut handle) = TanpuraEngine::new(SAMPLE_RATE);
        handle.set_config(EngineConfig {
            echo_level,
            ..EngineConfig::default()
        });
        handle.manual_pluck(Sa);

        let (_, samples) = run_blocks(&mut engine, &mut handle, 20);
        // Samples from 600 ms on: past the first pluck transient, inside the
        // echo repeats (0.4 s delay).
        samples[600..].iter().map(|s| s * s).sum()
    };

    let with_echo = tail_energy(1.0);
    let without_echo = tail_energy(0.0);
    assert!(
        with_echo > without_echo,
        "echo tail {with_echo} should exceed dry tail {without_echo}"
    );
}
