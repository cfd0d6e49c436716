//! Spectrum pane: FFT of the output tap, log-spaced bins.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Number of display bins in the sparkline.
const DISPLAY_BINS: usize = 48;

/// Magnitudes below this are drawn as zero.
const FLOOR_DB: f32 = -60.0;

const MIN_FREQ: f32 = 30.0;

pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    /// Hann window coefficients, reduces spectral leakage.
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// FFT bin backing each display bin, log-spaced in frequency.
    bin_indices: Vec<usize>,
    /// Display levels in [0, 100].
    levels: Vec<u64>,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, sample_rate: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                let denom = (fft_size.max(2) - 1) as f32;
                0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos())
            })
            .collect();

        let half = (fft_size / 2).max(1);
        let max_freq = (sample_rate / 2.0).max(MIN_FREQ * 2.0);
        let ratio = max_freq / MIN_FREQ;
        let bin_indices = (0..DISPLAY_BINS)
            .map(|i| {
                let t = i as f32 / (DISPLAY_BINS - 1) as f32;
                let freq = MIN_FREQ * ratio.powf(t);
                ((freq * fft_size as f32 / sample_rate.max(1.0)) as usize).min(half - 1)
            })
            .collect();

        Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            bin_indices,
            levels: vec![0; DISPLAY_BINS],
        }
    }

    /// Recompute levels from a full window of samples. A window of the wrong
    /// length is ignored.
    pub fn update(&mut self, samples: &[f32]) {
        if samples.len() != self.window.len() {
            return;
        }

        for (slot, (&sample, &coeff)) in self
            .scratch
            .iter_mut()
            .zip(samples.iter().zip(self.window.iter()))
        {
            slot.re = sample * coeff;
            slot.im = 0.0;
        }

        self.fft.process(&mut self.scratch);

        let scale = 2.0 / self.window.len() as f32;
        for (level, &index) in self.levels.iter_mut().zip(self.bin_indices.iter()) {
            let bin = self.scratch[index];
            let magnitude = (bin.re * bin.re + bin.im * bin.im).sqrt() * scale;
            let db = 20.0 * magnitude.max(1e-9).log10();
            let normalized = ((db - FLOOR_DB) / -FLOOR_DB).clamp(0.0, 1.0);
            *level = (normalized * 100.0) as u64;
        }
    }

    pub fn data(&self) -> &[u64] {
        &self.levels
    }
}
