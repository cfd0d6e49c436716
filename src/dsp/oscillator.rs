/// Phase-accumulator sine oscillator.
///
/// One instance per harmonic partial. The phase increment is fixed at
/// construction; a partial never changes pitch during its lifetime, so there
/// is no retune path.
pub struct SineOsc {
    phase: f32,
    phase_inc: f32,
}

impl SineOsc {
    pub fn new(frequency: f32, sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_inc: std::f32::consts::TAU * frequency / sample_rate,
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let out = self.phase.sin();
        self.phase += self.phase_inc;
        if self.phase >= std::f32::consts::TAU {
            self.phase -= std::f32::consts::TAU;
        }
        out
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn valid_sine() {
        let sample_rate = 48_000.0;
        let frequency = 440.0;
        let mut osc = SineOsc::new(frequency, sample_rate);

        let mut buffer = vec![0.0f32; 128];
        osc.render(&mut buffer);

        // sample n should be sin(2pi f n / sr)
        let sample_index = 12;
        let expected = (TAU * frequency * sample_index as f32 / sample_rate).sin();
        let actual = buffer[sample_index];
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn output_stays_in_range() {
        let mut osc = SineOsc::new(1320.0, 48_000.0);
        let mut buffer = vec![0.0f32; 4096];
        osc.render(&mut buffer);

        assert!(buffer.iter().all(|s| s.abs() <= 1.0 + 1e-6));
    }
}
