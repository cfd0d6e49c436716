//! The persistent signal graph.
//!
//! Built once, lazily, on the first sound-producing action and never torn
//! down: every pluck voice sums into a shared bus, the bus feeds an echo
//! loop, and bus plus echo pass through the smoothed master gain on the way
//! out. Live parameter changes retarget the existing gain stages; nothing is
//! ever rebuilt per pluck.

/// Feedback delay loop for the echo effect.
pub mod echo;

use crate::dsp::SmoothedValue;
use crate::graph::echo::EchoLoop;
use crate::voice::PluckVoice;
use crate::MAX_BLOCK_SIZE;

/// Ceiling on simultaneously ringing voices. With an 8 s decay and a 5 ms
/// minimum pluck gap the unbounded count would reach four figures; past this
/// ceiling the oldest voice is dropped, which is inaudible under the newer
/// ones.
pub const MAX_VOICES: usize = 64;

const SMOOTH_SECS: f32 = 0.01;

pub struct DroneGraph {
    voices: Vec<PluckVoice>,
    echo: EchoLoop,
    master: SmoothedValue,
    bus_buffer: Vec<f32>,
    temp_buffer: Vec<f32>,
}

impl DroneGraph {
    pub fn new(sample_rate: f32, master_volume: f32, echo_level: f32) -> Self {
        Self {
            voices: Vec::with_capacity(MAX_VOICES),
            echo: EchoLoop::new(sample_rate, echo_level),
            master: SmoothedValue::new(master_volume.clamp(0.0, 1.0), SMOOTH_SECS, sample_rate),
            bus_buffer: vec![0.0; MAX_BLOCK_SIZE],
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Smoothed retarget; never rebuilds anything.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master.set_target(volume.clamp(0.0, 1.0));
    }

    pub fn set_echo_level(&mut self, level: f32) {
        self.echo.set_level(level);
    }

    /// Connect a freshly plucked voice to the bus.
    pub fn spawn(&mut self, voice: PluckVoice) {
        if !voice.is_active() {
            return;
        }
        if self.voices.len() >= MAX_VOICES {
            // Voices are stored in spawn order; the front is the oldest.
            self.voices.remove(0);
        }
        self.voices.push(voice);
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        let frames = out.len();
        debug_assert!(frames <= MAX_BLOCK_SIZE);

        let bus = &mut self.bus_buffer[..frames];
        bus.fill(0.0);

        for voice in &mut self.voices {
            let temp = &mut self.temp_buffer[..frames];
            temp.fill(0.0);
            voice.render_block(temp);

            for (b, v) in bus.iter_mut().zip(temp.iter()) {
                *b += v;
            }
        }

        for (o, &b) in out.iter_mut().zip(bus.iter()) {
            let wet = self.echo.tick(b);
            *o = (b + wet) * self.master.next_sample();
        }

        self.voices.retain(|voice| voice.is_active());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 8_000.0;

    fn graph() -> DroneGraph {
        DroneGraph::new(SAMPLE_RATE, 0.5, 0.0)
    }

    #[test]
    fn silent_without_voices() {
        let mut graph = graph();
        let mut out = vec![1.0f32; 256];
        graph.render_block(&mut out);

        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn spawned_voice_reaches_the_output() {
        let mut graph = graph();
        graph.spawn(PluckVoice::new(220.0, 0.8, SAMPLE_RATE));

        let mut out = vec![0.0f32; 512];
        graph.render_block(&mut out);

        assert!(out.iter().any(|&s| s.abs() > 0.0));
        assert!(out.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn master_volume_scales_output() {
        let mut loud = graph();
        loud.set_master_volume(1.0);
        loud.spawn(PluckVoice::new(220.0, 0.8, SAMPLE_RATE));

        let mut quiet = graph();
        quiet.set_master_volume(0.1);
        quiet.spawn(PluckVoice::new(220.0, 0.8, SAMPLE_RATE));

        let mut out_loud = vec![0.0f32; 2048];
        let mut out_quiet = vec![0.0f32; 2048];
        loud.render_block(&mut out_loud);
        quiet.render_block(&mut out_quiet);

        let peak_loud = out_loud.iter().fold(0.0f32, |a, s| a.max(s.abs()));
        let peak_quiet = out_quiet.iter().fold(0.0f32, |a, s| a.max(s.abs()));
        assert!(peak_loud > peak_quiet * 2.0);
    }

    #[test]
    fn inactive_voice_is_not_retained() {
        let mut graph = graph();
        graph.spawn(PluckVoice::new(220.0, 0.0, SAMPLE_RATE));
        assert_eq!(graph.active_voices(), 0);
    }

    #[test]
    fn voice_count_stays_bounded() {
        let mut graph = graph();
        for _ in 0..(MAX_VOICES * 2) {
            graph.spawn(PluckVoice::new(220.0, 0.8, SAMPLE_RATE));
        }
        assert_eq!(graph.active_voices(), MAX_VOICES);
    }

    #[test]
    fn expired_voices_are_dropped_after_render() {
        let sample_rate = 500.0;
        let mut graph = DroneGraph::new(sample_rate, 0.5, 0.0);
        graph.spawn(PluckVoice::new(110.0, 0.8, sample_rate));
        assert_eq!(graph.active_voices(), 1);

        // 8 s window at 500 Hz = 4000 samples.
        let mut out = vec![0.0f32; 64];
        for _ in 0..70 {
            graph.render_block(&mut out);
        }

        assert_eq!(graph.active_voices(), 0);
    }
}
