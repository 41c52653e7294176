//! Feed-forward compressor with a soft knee.
//!
//! The gain computer works in dB:
//!
//! ```text
//!  out dB
//!    |                    ____ slope 1/ratio
//!    |               __--
//!    |            _-'        knee: quadratic blend of width `knee_db`
//!    |          /            centred on the threshold
//!    |        /  slope 1
//!    +-------+--------------> in dB
//!        threshold
//! ```
//!
//! The resulting gain reduction is smoothed with separate attack and release
//! time constants, so peaks are caught fast and the gain recovers slowly.
//! A limiter is the same structure with a high ratio, no knee and short times.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsSettings {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    /// Seconds.
    pub attack: f32,
    /// Seconds.
    pub release: f32,
}

impl DynamicsSettings {
    /// Heavy bus compression ahead of the limiter.
    pub const BUS_COMPRESSOR: Self = Self {
        threshold_db: -20.0,
        knee_db: 20.0,
        ratio: 6.0,
        attack: 0.002,
        release: 0.15,
    };

    /// Safety limiter against stacking and runaway feedback.
    pub const SAFETY_LIMITER: Self = Self {
        threshold_db: -6.0,
        knee_db: 0.0,
        ratio: 20.0,
        attack: 0.001,
        release: 0.05,
    };
}

#[inline]
fn lin_to_db(linear: f32) -> f32 {
    20.0 * linear.max(1e-6).log10()
}

#[inline]
fn db_to_lin(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

fn time_coefficient(seconds: f32, sample_rate: f32) -> f32 {
    (-1.0 / (seconds.max(1e-5) * sample_rate)).exp()
}

pub struct Compressor {
    settings: DynamicsSettings,
    attack_coeff: f32,
    release_coeff: f32,
    /// Smoothed gain reduction in dB (<= 0).
    reduction_db: f32,
}

impl Compressor {
    pub fn new(settings: DynamicsSettings, sample_rate: f32) -> Self {
        Self {
            settings,
            attack_coeff: time_coefficient(settings.attack, sample_rate),
            release_coeff: time_coefficient(settings.release, sample_rate),
            reduction_db: 0.0,
        }
    }

    pub fn settings(&self) -> DynamicsSettings {
        self.settings
    }

    /// Current gain reduction in dB (0 = none).
    pub fn reduction_db(&self) -> f32 {
        self.reduction_db
    }

    /// Static gain reduction in dB for a level of `input_db`.
    pub fn gain_computer(&self, input_db: f32) -> f32 {
        let DynamicsSettings {
            threshold_db,
            knee_db,
            ratio,
            ..
        } = self.settings;
        let slope = 1.0 / ratio.max(1.0) - 1.0;
        let over = input_db - threshold_db;

        if knee_db > 0.0 && 2.0 * over.abs() <= knee_db {
            let x = over + knee_db / 2.0;
            slope * x * x / (2.0 * knee_db)
        } else if over > 0.0 {
            slope * over
        } else {
            0.0
        }
    }

    #[inline]
    pub fn process(&mut self, sample: f32) -> f32 {
        let target = self.gain_computer(lin_to_db(sample.abs()));
        let coeff = if target < self.reduction_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.reduction_db = target + (self.reduction_db - target) * coeff;
        sample * db_to_lin(self.reduction_db)
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_signal_passes_untouched() {
        let comp = Compressor::new(DynamicsSettings::SAFETY_LIMITER, 48_000.0);
        assert_eq!(comp.gain_computer(-30.0), 0.0);
    }

    #[test]
    fn test_hard_knee_reduction_above_threshold() {
        let comp = Compressor::new(DynamicsSettings::SAFETY_LIMITER, 48_000.0);
        // 10 dB over at 20:1 comes out 0.5 dB over.
        let reduction = comp.gain_computer(4.0);
        assert!((reduction - (-9.5)).abs() < 1e-4);
    }

    #[test]
    fn test_soft_knee_is_continuous_at_edges() {
        let comp = Compressor::new(DynamicsSettings::BUS_COMPRESSOR, 48_000.0);
        // Knee spans -30 dB to -10 dB.
        assert!(comp.gain_computer(-30.0).abs() < 1e-4);
        let inside = comp.gain_computer(-10.0 - 1e-3);
        let outside = comp.gain_computer(-10.0 + 1e-3);
        assert!((inside - outside).abs() < 1e-2);
    }

    #[test]
    fn test_limiter_tames_loud_sine() {
        let mut limiter = Compressor::new(DynamicsSettings::SAFETY_LIMITER, 48_000.0);
        let mut peak: f32 = 0.0;
        for i in 0..48_000 {
            let x = 2.0 * (i as f32 * 0.05).sin();
            let y = limiter.process(x);
            if i > 24_000 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak < 1.0, "limited peak {}", peak);
        assert!(limiter.reduction_db() < 0.0);
    }
}
