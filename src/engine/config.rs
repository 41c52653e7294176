#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::AudioEngineFault;

/// Construction-time settings for an [`Engine`](super::Engine).
///
/// Timeouts are in seconds. They are tunables, not contracts: the
/// auto-release bounds how long a lost key-up can hold a voice, the
/// others shape how fast things fall silent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Forced release this long after a voice is triggered.
    pub auto_release_secs: f32,
    /// Extra time a released voice keeps rendering before teardown.
    pub teardown_grace_secs: f32,
    pub panic_release_secs: f32,
    /// Release used when a held key or pad is let go.
    pub key_release_secs: f32,
    pub kick_debounce_secs: f32,
    pub fft_size: usize,
    pub smoothing: f32,
    /// When false, releases pin the current gain instead of using
    /// cancel-and-hold.
    pub cancel_and_hold: bool,
    /// Fixes every random choice (detune jitter, noise) when set.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            auto_release_secs: 3.0,
            teardown_grace_secs: 0.12,
            panic_release_secs: 0.02,
            key_release_secs: 0.08,
            kick_debounce_secs: 0.05,
            fft_size: 256,
            smoothing: 0.8,
            cancel_and_hold: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), AudioEngineFault> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(AudioEngineFault::InvalidSampleRate(self.sample_rate));
        }
        if !self.fft_size.is_power_of_two() || !(32..=32_768).contains(&self.fft_size) {
            return Err(AudioEngineFault::InvalidAnalyserSize(self.fft_size));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(AudioEngineFault::InvalidSmoothing(self.smoothing));
        }

        let timeouts = [
            ("auto_release_secs", self.auto_release_secs),
            ("teardown_grace_secs", self.teardown_grace_secs),
            ("panic_release_secs", self.panic_release_secs),
            ("key_release_secs", self.key_release_secs),
            ("kick_debounce_secs", self.kick_debounce_secs),
        ];
        for (name, value) in timeouts {
            if !(value.is_finite() && value > 0.0) {
                return Err(AudioEngineFault::InvalidTimeout { name, value });
            }
        }

        Ok(())
    }
}
