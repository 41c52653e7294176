use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
| type      | passes          | rejects      | used for                          |
| --------- | --------------- | ------------ | --------------------------------- |
| low-pass  | below cutoff    | above cutoff | master tone, darkening sweeps     |
| high-pass | above cutoff    | below cutoff | hats, crash, distortion clean-up  |
| band-pass | around cutoff   | elsewhere    | formants, claps, wind             |
| notch     | outside cutoff  | around it    | (available, not used by catalog)  |

Topology-preserving-transform state variable filter. One structure yields all
four responses; `q` sets the damping k = 1/q, so q = 0.707 is Butterworth and
higher q rings at the cutoff.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
    pub notch: f32,
}

const MIN_Q: f32 = 0.05;

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32,
    ic2eq: f32,

    pub cutoff_hz: f32,
    pub q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q: q.max(MIN_Q),
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, std::f32::consts::FRAC_1_SQRT_2)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, std::f32::consts::FRAC_1_SQRT_2)
    }

    pub fn bandpass(cutoff_hz: f32, q: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz, q)
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    /// Integrator gain for `cutoff_hz`, pre-warped and kept below Nyquist.
    #[inline]
    pub fn coefficient(cutoff_hz: f32, sample_rate: f32) -> f32 {
        let nyquist_guard = sample_rate * 0.49;
        let cutoff = cutoff_hz.clamp(1.0, nyquist_guard);
        (PI * cutoff / sample_rate).tan()
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
            notch: sample - k * v1,
        }
    }

    /// Filter one sample at an explicit cutoff (for swept filters).
    #[inline]
    pub fn process_at(&mut self, sample: f32, cutoff_hz: f32, sample_rate: f32) -> f32 {
        let g = Self::coefficient(cutoff_hz, sample_rate);
        let k = 1.0 / self.q;
        self.select(sample, k, g)
    }

    #[inline]
    fn select(&mut self, sample: f32, k: f32, g: f32) -> f32 {
        let outputs = self.next_sample(sample, k, g);
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            // constant 0 dB peak, whatever the q
            FilterType::BandPass => outputs.bandpass * k,
            FilterType::Notch => outputs.notch,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = Self::coefficient(self.cutoff_hz, sample_rate);
        let k = 1.0 / self.q;

        for sample in buffer.iter_mut() {
            *sample = self.select(*sample, k, g);
        }
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q.max(MIN_Q);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::{Oscillator, Waveform};

    fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        let mut osc = Oscillator::new(Waveform::Sine);
        let mut buf = vec![0.0; len];
        osc.render(&mut buf, freq, sample_rate);
        buf
    }

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer[skip..].iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer, 48_000.0);
        assert!(buffer[511] > 0.99);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let mut filter = SVFilter::highpass(500.0);
        let mut buffer = vec![1.0; 512];
        filter.render(&mut buffer, 48_000.0);
        assert!(buffer[511].abs() < 0.01);
    }

    #[test]
    fn test_lowpass_attenuates_above_cutoff() {
        let mut filter = SVFilter::lowpass(500.0);
        let mut buffer = sine(5_000.0, 48_000.0, 1024);
        filter.render(&mut buffer, 48_000.0);

        let peak = peak_after_transient(&buffer);
        assert!(peak < 0.1, "expected attenuation, got peak {}", peak);
    }

    #[test]
    fn test_bandpass_emphasizes_center() {
        let sample_rate = 48_000.0;
        let mut filter = SVFilter::bandpass(1_000.0, 4.0);

        let mut center = sine(1_000.0, sample_rate, 2048);
        filter.render(&mut center, sample_rate);
        let center_peak = peak_after_transient(&center);

        let mut filter = SVFilter::bandpass(1_000.0, 4.0);
        let mut off = sine(200.0, sample_rate, 2048);
        filter.render(&mut off, sample_rate);
        let off_peak = peak_after_transient(&off);

        assert!(
            center_peak > off_peak * 2.0,
            "center {} vs off {}",
            center_peak,
            off_peak
        );
    }

    #[test]
    fn test_coefficient_clamps_above_nyquist() {
        let g = SVFilter::coefficient(100_000.0, 8_000.0);
        assert!(g.is_finite());
        assert!(g > 0.0);
    }

    #[test]
    fn test_set_q_rejects_zero() {
        let mut filter = SVFilter::lowpass(1_000.0);
        filter.set_q(0.0);
        assert!(filter.q >= MIN_Q);
    }
}
