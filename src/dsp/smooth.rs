/// Smoothed parameter value for click-free control changes.
///
/// Ramps linearly from the current value to the target over a fixed sample
/// count. Call [`next_sample`](SmoothedValue::next_sample) once per sample in
/// the render loop; retargeting mid-ramp restarts the ramp from the current
/// value, so there is never a discontinuity.
#[derive(Debug, Clone)]
pub struct SmoothedValue {
    current: f32,
    target: f32,
    step: f32,
    samples_remaining: u32,
    smooth_samples: u32,
}

impl SmoothedValue {
    pub fn new(initial: f32, smooth_time_secs: f32, sample_rate: f32) -> Self {
        let smooth_samples = (smooth_time_secs * sample_rate).max(1.0) as u32;

        Self {
            current: initial,
            target: initial,
            step: 0.0,
            samples_remaining: 0,
            smooth_samples,
        }
    }

    #[inline]
    pub fn set_target(&mut self, target: f32) {
        if (target - self.target).abs() < f32::EPSILON {
            return;
        }

        self.target = target;
        self.samples_remaining = self.smooth_samples;
        self.step = (self.target - self.current) / self.samples_remaining as f32;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.step;
            self.samples_remaining -= 1;

            // Snap to target when done to avoid floating point drift
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }

        self.current
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn is_smoothing(&self) -> bool {
        self.samples_remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_target() {
        let mut smooth = SmoothedValue::new(0.0, 0.01, 1_000.0);
        smooth.set_target(1.0);

        for _ in 0..20 {
            smooth.next_sample();
        }

        assert!(!smooth.is_smoothing());
        assert!((smooth.current() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ramp_is_gradual() {
        let mut smooth = SmoothedValue::new(0.0, 0.01, 1_000.0);
        smooth.set_target(1.0);

        let first = smooth.next_sample();
        assert!(first > 0.0 && first < 0.5, "first step jumped to {first}");
    }

    #[test]
    fn retarget_mid_ramp_has_no_discontinuity() {
        let mut smooth = SmoothedValue::new(0.0, 0.01, 1_000.0);
        smooth.set_target(1.0);

        for _ in 0..5 {
            smooth.next_sample();
        }
        let mid = smooth.current();
        assert!(mid > 0.0 && mid < 1.0);

        smooth.set_target(0.0);
        let next = smooth.next_sample();
        assert!((next - mid).abs() < 0.2, "retarget jumped from {mid} to {next}");

        for _ in 0..20 {
            smooth.next_sample();
        }
        assert!((smooth.current()).abs() < 1e-6);
    }

    #[test]
    fn same_target_does_not_restart_ramp() {
        let mut smooth = SmoothedValue::new(0.5, 0.01, 1_000.0);
        smooth.set_target(0.5);

        assert!(!smooth.is_smoothing());
    }
}
