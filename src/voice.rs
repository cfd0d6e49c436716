//! The plucked-string voice.
//!
//! A tanpura string is approximated additively: six sine partials at integer
//! multiples of the fundamental, with amplitudes falling off roughly the way
//! a plucked string's spectrum does, all shaped by one shared envelope. The
//! voice is write-once: created at pluck time, it rings for the envelope's
//! decay window and then reports itself inactive so the graph can drop it.

use crate::dsp::{PluckEnvelope, SineOsc};

/// Relative amplitude of each partial, fundamental first.
const PARTIAL_AMPLITUDES: [f32; 6] = [1.0, 0.8, 0.5, 0.3, 0.15, 0.1];

/// Attack peak is the string volume scaled down for headroom, so several
/// strings ringing together stay clear of clipping.
const PEAK_SCALE: f32 = 0.5;

pub struct PluckVoice {
    partials: [SineOsc; PARTIAL_AMPLITUDES.len()],
    envelope: PluckEnvelope,
}

impl PluckVoice {
    /// `volume` is the per-string setting in [0, 1].
    pub fn new(frequency: f32, volume: f32, sample_rate: f32) -> Self {
        let partials = std::array::from_fn(|i| {
            SineOsc::new(frequency * (i + 1) as f32, sample_rate)
        });

        Self {
            partials,
            envelope: PluckEnvelope::new(volume.clamp(0.0, 1.0) * PEAK_SCALE, sample_rate),
        }
    }

    #[inline]
    fn next_sample(&mut self) -> f32 {
        let gain = self.envelope.next_sample();
        if gain == 0.0 {
            // Keep the partials phase-coherent even while inaudible.
            for osc in &mut self.partials {
                osc.next_sample();
            }
            return 0.0;
        }

        let mut sum = 0.0;
        for (osc, amplitude) in self.partials.iter_mut().zip(PARTIAL_AMPLITUDES) {
            sum += osc.next_sample() * amplitude;
        }
        sum * gain
    }

    pub fn render_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// True until the decay window closes.
    pub fn is_active(&self) -> bool {
        self.envelope.is_active()
    }

    /// Current envelope level, for meters.
    pub fn level(&self) -> f32 {
        self.envelope.level()
    }
}
