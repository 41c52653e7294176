//! Frequency-domain tap for metering and visualisation.
//!
//! The analyser keeps the most recent `fft_size` samples of whatever passes
//! through it. Each read windows that history (Hann), runs a forward FFT,
//! blends the bin magnitudes with the previous read (`smoothing`) and maps
//! them from the [-100 dB, -30 dB] display range onto [0, 1]. Reads are
//! consumer-driven: nothing is computed until someone asks, and repeated
//! reads with no new capture in between return the cached frame.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::AudioEngineFault;

pub const MIN_DECIBELS: f32 = -100.0;
pub const MAX_DECIBELS: f32 = -30.0;

pub struct Analyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    history: Vec<f32>,
    write_pos: usize,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    normalized: Vec<f32>,
    smoothing: f32,
    /// Samples were captured since the last analysis.
    fresh: bool,
}

impl Analyser {
    pub fn new(fft_size: usize, smoothing: f32) -> Result<Self, AudioEngineFault> {
        if !fft_size.is_power_of_two() || !(32..=32_768).contains(&fft_size) {
            return Err(AudioEngineFault::InvalidAnalyserSize(fft_size));
        }
        if !(0.0..1.0).contains(&smoothing) {
            return Err(AudioEngineFault::InvalidSmoothing(smoothing));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let denom = (fft_size - 1) as f32;
        let window = (0..fft_size)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / denom).cos()))
            .collect();

        let bins = fft_size / 2;
        Ok(Self {
            fft,
            window,
            history: vec![0.0; fft_size],
            write_pos: 0,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            smoothed: vec![0.0; bins],
            normalized: vec![0.0; bins],
            smoothing,
            fresh: false,
        })
    }

    pub fn fft_size(&self) -> usize {
        self.history.len()
    }

    pub fn bin_count(&self) -> usize {
        self.smoothed.len()
    }

    /// Record a block of the signal passing through the tap.
    pub fn capture(&mut self, block: &[f32]) {
        let len = self.history.len();
        for &sample in block {
            self.history[self.write_pos] = sample;
            self.write_pos = (self.write_pos + 1) % len;
        }
        self.fresh |= !block.is_empty();
    }

    /// Per-bin magnitudes scaled to [0, 1].
    pub fn frequency_data(&mut self) -> &[f32] {
        if self.fresh {
            self.analyse();
        }
        &self.normalized
    }

    fn analyse(&mut self) {
        self.fresh = false;
        let len = self.history.len();
        for i in 0..len {
            let sample = self.history[(self.write_pos + i) % len];
            self.scratch[i] = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.scratch);

        let scale = 1.0 / len as f32;
        let range = MAX_DECIBELS - MIN_DECIBELS;
        for (bin, (smoothed, normalized)) in self
            .smoothed
            .iter_mut()
            .zip(self.normalized.iter_mut())
            .enumerate()
        {
            let magnitude = self.scratch[bin].norm() * scale;
            *smoothed = self.smoothing * *smoothed + (1.0 - self.smoothing) * magnitude;

            let db = 20.0 * smoothed.max(1e-12).log10();
            *normalized = ((db - MIN_DECIBELS) / range).clamp(0.0, 1.0);
        }
    }

    /// Mean of the normalized bins.
    pub fn level(&mut self) -> f32 {
        let data = self.frequency_data();
        if data.is_empty() {
            return 0.0;
        }
        data.iter().sum::<f32>() / data.len() as f32
    }
}
