//! Generic synthesis building blocks the catalog composes sounds from.

use rand::Rng;

use crate::dsp::filter::FilterType;
use crate::dsp::oscillator::Waveform;
use crate::sounds::recipe::{Contour, Curve, Layer, NoiseColor, Recipe};

/// Level an exponential decay heads for; inaudible but non-zero.
pub const FAINT: f32 = 0.001;

/// A chord in one layer: one oscillator per frequency, one shared gain.
pub fn tonal_stack<I>(waveform: Waveform, frequencies: I) -> Layer
where
    I: IntoIterator<Item = f32>,
{
    let mut frequencies = frequencies.into_iter();
    let first = frequencies.next().unwrap_or(0.0);
    frequencies.fold(Layer::tone(waveform, first), |layer, hz| {
        layer.plus_tone(waveform, hz)
    })
}

/// White noise shaped by `contour`, lasting `length` seconds.
pub fn noise_burst(length: f32, contour: Contour) -> Layer {
    Layer::noise(NoiseColor::White, 1.0, length, contour)
}

/// An oscillator gliding exponentially from `from` to `to` Hz.
pub fn sweep(waveform: Waveform, from: f32, to: f32, over: f32) -> Layer {
    Layer::osc(waveform, Curve::at(from).exp(over, to))
}

/// The same carrier through one band-pass per formant.
pub fn formant(carrier: Layer, formants: &[f32], q: f32) -> Recipe {
    formants
        .iter()
        .map(|&hz| carrier.clone().filter(FilterType::BandPass, Curve::at(hz), q))
        .collect()
}

/// Hit at `peak`, decaying exponentially to silence by `at`.
pub fn decay(peak: f32, at: f32) -> Curve {
    Curve::at(peak).exp(at, FAINT)
}

/// Fade in to `peak`, settle to `hold`, fade out by `end`.
pub fn swell(peak_at: f32, peak: f32, hold_at: f32, hold: f32, end: f32) -> Curve {
    Curve::at(0.0)
        .linear(peak_at, peak)
        .linear(hold_at, hold)
        .linear(end, 0.0)
}

/// Start each layer `step` seconds after the previous one.
pub fn staggered(layers: Recipe, step: f32) -> Recipe {
    layers
        .into_iter()
        .enumerate()
        .map(|(i, layer)| {
            let start = layer.start + i as f32 * step;
            layer.starting(start)
        })
        .collect()
}

/// Uniform draw in `[-span / 2, span / 2)`.
pub fn jitter<R: Rng>(rng: &mut R, span: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * span
}
