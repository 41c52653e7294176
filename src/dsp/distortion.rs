//! Waveshaping transfer curves.
//!
//! A shaper maps each sample through a fixed curve. Input is clamped to
//! [-1, 1] first, which is the domain the curves are defined on, so a hot
//! signal saturates at the curve's end points instead of growing.
//!
//! ```text
//!  out                       Warm:   tanh(1.5x) * 0.9 + 0.1x
//!   1 |          ______       Tanh(k): tanh(k * x)
//!     |       .-'
//!   0 |-----/-----------      Higher k squares the wave off sooner and
//!     |  _.'                  adds more odd harmonics.
//!  -1 |-'
//!     +-----------------> in
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShaperCurve {
    /// Gentle tube-style saturation with a linear component left in.
    Warm,
    /// Symmetric hyperbolic tangent with the given steepness.
    Tanh(f32),
}

impl ShaperCurve {
    #[inline]
    pub fn apply(&self, sample: f32) -> f32 {
        let x = sample.clamp(-1.0, 1.0);
        match *self {
            Self::Warm => (1.5 * x).tanh() * 0.9 + 0.1 * x,
            Self::Tanh(k) => (k * x).tanh(),
        }
    }

    pub fn apply_buffer(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.apply(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_curve_is_odd_and_bounded() {
        for i in 0..=100 {
            let x = i as f32 / 100.0;
            let pos = ShaperCurve::Warm.apply(x);
            let neg = ShaperCurve::Warm.apply(-x);
            assert!((pos + neg).abs() < 1e-6);
            assert!(pos <= 1.0);
        }
    }

    #[test]
    fn test_input_beyond_unit_range_is_clamped() {
        let curve = ShaperCurve::Tanh(5.0);
        assert_eq!(curve.apply(10.0), curve.apply(1.0));
    }

    #[test]
    fn test_steeper_tanh_saturates_sooner() {
        let soft = ShaperCurve::Tanh(2.0).apply(0.3);
        let hard = ShaperCurve::Tanh(10.0).apply(0.3);
        assert!(hard > soft);
        assert!(hard > 0.99);
    }
}
