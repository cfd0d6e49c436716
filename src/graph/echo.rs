use crate::dsp::{DelayLine, SmoothedValue};

/// Tap position of the echo. Architectural constant, not a user parameter.
const ECHO_DELAY_SECS: f32 = 0.4;

/// Delay line capacity.
const MAX_DELAY_SECS: f32 = 5.0;

/// Ceiling on the feedback gain. Keeping it strictly below 1.0 guarantees
/// every trip around the loop loses energy, so echo buildup is bounded for
/// any input. Values near 1.0 also read as a "second note" rather than an
/// echo, which is not what a drone wants.
const MAX_FEEDBACK: f32 = 0.7;

const SMOOTH_SECS: f32 = 0.01;

fn feedback_gain(level: f32) -> f32 {
    level.clamp(0.0, 1.0) * MAX_FEEDBACK
}

/// Feedback delay loop fed from the voice bus.
///
/// The delayed signal is both returned (it sums into the master stage) and
/// fed back into the line through the feedback gain, producing repeats that
/// decay by the gain factor each pass. Only the feedback gain is exposed;
/// retargeting it is smoothed so live echo changes never click.
pub struct EchoLoop {
    line: DelayLine,
    feedback: SmoothedValue,
    delay_samples: usize,
}

impl EchoLoop {
    pub fn new(sample_rate: f32, level: f32) -> Self {
        Self {
            line: DelayLine::new((MAX_DELAY_SECS * sample_rate) as usize),
            feedback: SmoothedValue::new(feedback_gain(level), SMOOTH_SECS, sample_rate),
            delay_samples: (ECHO_DELAY_SECS * sample_rate) as usize,
        }
    }

    /// `level` in [0, 1]; mapped onto [0, MAX_FEEDBACK].
    pub fn set_level(&mut self, level: f32) {
        self.feedback.set_target(feedback_gain(level));
    }

    pub fn feedback_target(&self) -> f32 {
        self.feedback.target()
    }

    /// Process one bus sample; returns the wet (delayed) sample.
    #[inline]
    pub fn tick(&mut self, input: f32) -> f32 {
        let delayed = self.line.read(self.delay_samples);
        let gain = self.feedback.next_sample();
        self.line.write(input + delayed * gain);
        delayed
    }
}
