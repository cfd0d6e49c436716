use crate::MIN_TIME;

/*
Pluck Envelope
==============

A plucked drone string has no sustain: the amplitude jumps up almost
instantly, then dies away slowly while the string rings. This envelope
models exactly that, and nothing else.

The Shape
---------

  Level
  peak ┐  ╱╲
       │ ╱   ╲__
       │╱       ╲______
   0.0 └────────────────────→ Time
       Attack    Decay (exponential)
       (10 ms)   (to the 8 s window)

Attack is a linear ramp from 0 to `peak` over 10 ms. The ramp exists to
avoid the click a hard edge would produce; it is too short to hear as an
attack.

Decay is exponential, which is how real strings lose energy. We multiply
the level by a constant coefficient every sample, chosen so the level
reaches a -80 dB floor (1e-4 of full scale) exactly when the 8 second
window closes:

    coeff = (floor / peak) ^ (1 / decay_samples)

At the end of the window the level snaps to 0 and the envelope reports
itself done. The voice's lifetime is therefore bounded at creation time;
nothing outside the envelope has to tear it down.

A peak at or below the floor never becomes audible, so the envelope starts
in the Done stage and the caller can skip spawning the voice entirely.
*/

const ATTACK_TIME: f32 = 0.01;
const DECAY_WINDOW: f32 = 8.0;
const DECAY_FLOOR: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Attack,
    Decay,
    Done,
}

pub struct PluckEnvelope {
    peak: f32,
    attack_increment: f32,
    decay_coeff: f32,
    total_samples: u64,
    elapsed: u64,
    stage: Stage,
    level: f32,
}

impl PluckEnvelope {
    /// `peak` is the target level of the attack ramp, already scaled for
    /// headroom by the caller.
    pub fn new(peak: f32, sample_rate: f32) -> Self {
        let peak = peak.clamp(0.0, 1.0);
        let sample_rate = sample_rate.max(1.0);

        if peak <= DECAY_FLOOR {
            return Self {
                peak,
                attack_increment: 0.0,
                decay_coeff: 0.0,
                total_samples: 0,
                elapsed: 0,
                stage: Stage::Done,
                level: 0.0,
            };
        }

        let attack_samples = (ATTACK_TIME.max(MIN_TIME) * sample_rate).max(1.0);
        let decay_samples = ((DECAY_WINDOW - ATTACK_TIME) * sample_rate).max(1.0);
        let total_samples = (DECAY_WINDOW * sample_rate) as u64;

        Self {
            peak,
            attack_increment: peak / attack_samples,
            decay_coeff: (DECAY_FLOOR / peak).powf(1.0 / decay_samples),
            total_samples,
            elapsed: 0,
            stage: Stage::Attack,
            level: 0.0,
        }
    }

    /// Advance one sample and return the current amplitude multiplier.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            Stage::Attack => {
                self.level += self.attack_increment;
                if self.level >= self.peak {
                    self.level = self.peak;
                    self.stage = Stage::Decay;
                }
            }
            Stage::Decay => {
                self.level *= self.decay_coeff;
                if self.elapsed >= self.total_samples {
                    self.level = 0.0;
                    self.stage = Stage::Done;
                }
            }
            Stage::Done => {
                self.level = 0.0;
            }
        }

        self.elapsed = self.elapsed.saturating_add(1);
        self.level
    }

    /// True until the decay window has elapsed.
    pub fn is_active(&self) -> bool {
        self.stage != Stage::Done
    }

    pub fn level(&self) -> f32 {
        self.level
    }
}
