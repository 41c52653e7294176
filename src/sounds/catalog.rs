//! Recipes for every [`SoundId`].
//!
//! Each arm describes one sound as layers built from the primitives.
//! Velocity is baked into the gain curves here; anything random (detune
//! jitter, sparkle timing) is drawn from the caller's RNG so a seeded
//! engine renders identically every run.

use rand::Rng;

use crate::dsp::distortion::ShaperCurve;
use crate::dsp::filter::FilterType;
use crate::dsp::oscillator::Waveform::{Saw, Sine, Square, Triangle};
use crate::graph::signal_graph::Bus;
use crate::sounds::primitives::{
    decay, formant, jitter, noise_burst, staggered, sweep, swell, tonal_stack, FAINT,
};
use crate::sounds::recipe::{delayed, Contour, Curve, Layer, LfoTarget, NoiseColor, Recipe, Swell};
use crate::sounds::SoundId;

const C_MAJOR_7: [f32; 4] = [261.63, 329.63, 392.0, 493.88];
const LOW_C_CHORD: [f32; 4] = [130.81, 164.81, 196.0, 261.63];

const WIND_SWELL: [Swell; 1] = [Swell {
    rate: 0.5,
    phase: 0.0,
    depth: 0.5,
    offset: 0.5,
}];

const OCEAN_WAVES: [Swell; 2] = [
    Swell {
        rate: 0.3,
        phase: 0.0,
        depth: 0.5,
        offset: 0.5,
    },
    Swell {
        rate: 0.5,
        phase: 1.0,
        depth: 0.3,
        offset: 0.5,
    },
];

/// Build the layers for one playback of `id` at `velocity`.
pub fn recipe<R: Rng>(id: SoundId, velocity: f32, rng: &mut R) -> Recipe {
    let v = velocity;
    match id {
        // ── drums ──────────────────────────────────────────────────────
        SoundId::Kick => vec![
            sweep(Sine, 150.0, 35.0, 0.15)
                .lowpass(200.0, 1.0)
                .gain(decay(v, 0.8))
                .stop(1.0)
                .to(Bus::Compressor),
            Layer::tone(Square, 1000.0)
                .gain(decay(v * 0.3, 0.02))
                .stop(0.03)
                .to(Bus::Compressor),
        ],
        SoundId::Snare => vec![
            sweep(Triangle, 200.0, 120.0, 0.1)
                .gain(decay(v * 0.5, 0.2))
                .stop(0.3)
                .to(Bus::Compressor),
            noise_burst(0.2, Contour::Flat)
                .highpass(3000.0)
                .gain(decay(v * 0.4, 0.15))
                .to(Bus::Compressor),
        ],
        SoundId::ClosedHat => hi_hat(v, 0.08),
        SoundId::OpenHat => hi_hat(v, 0.3),
        SoundId::Clap => staggered(
            vec![
                noise_burst(0.1, Contour::Flat)
                    .bandpass(2500.0, 2.0)
                    .gain(decay(v * 0.3, 0.1));
                4
            ],
            0.01,
        ),
        SoundId::Rim => vec![sweep(Triangle, 800.0, 300.0, 0.02)
            .gain(decay(v * 0.4, 0.05))
            .stop(0.1)
            .to(Bus::Compressor)],
        SoundId::Perc => [800.0, 1200.0, 1600.0, 2400.0]
            .into_iter()
            .enumerate()
            .map(|(i, hz)| {
                Layer::tone(Sine, hz + rng.gen::<f32>() * 50.0)
                    .gain(decay(v * 0.15 / (i + 1) as f32, 0.3 + i as f32 * 0.1))
                    .stop(0.5)
            })
            .collect(),
        SoundId::Shimmer => (0..6)
            .map(|i| {
                Layer::tone(Sine, 2000.0 + i as f32 * 500.0 + rng.gen::<f32>() * 200.0)
                    .gain(Curve::at(0.0).linear(0.1, v * 0.1).exp(1.5, FAINT))
                    .stop(2.0)
            })
            .collect(),

        // ── choir ──────────────────────────────────────────────────────
        SoundId::HeavenlyChoir => {
            let mut layers = Vec::new();
            for hz in [261.63, 329.63, 392.0, 523.25, 659.25] {
                for voice in 0..4 {
                    let spread = hz * (1.0 + (voice as f32 - 1.5) * 0.002);
                    layers.push(
                        Layer::tone(Sine, spread)
                            .detune(jitter(rng, 15.0))
                            .lfo(5.0 + rng.gen::<f32>(), hz * 0.008, LfoTarget::Frequency)
                            .gain(swell(0.4, v * 0.08, 2.0, v * 0.06, 4.0))
                            .stop(4.5),
                    );
                }
            }
            layers
        }
        SoundId::GospelChoir => {
            let mut layers = Vec::new();
            for hz in [196.0, 246.94, 293.66, 392.0, 493.88] {
                for voice in 0..3 {
                    let voice = voice as f32;
                    layers.push(
                        Layer::tone(Sine, hz * (1.0 + voice * 0.003))
                            .plus_tone(Triangle, hz * 2.0 * (1.0 + voice * 0.002))
                            .gain(
                                Curve::at(0.0)
                                    .linear(0.3, v * 0.1)
                                    .set(0.5, v * 0.1)
                                    .linear(1.0, v * 0.15)
                                    .linear(3.0, 0.0),
                            )
                            .stop(3.5),
                    );
                }
            }
            layers
        }
        SoundId::AngelVoice => [700.0, 1100.0, 2600.0]
            .into_iter()
            .enumerate()
            .map(|(i, hz)| {
                let level = v * 0.15 / (i + 1) as f32;
                Layer::tone(Saw, 440.0)
                    .filter(FilterType::BandPass, Curve::at(hz), 12.0)
                    .lfo(5.5, hz * 0.02, LfoTarget::Cutoff)
                    .gain(swell(0.2, level, 2.0, level * (0.1 / 0.15), 3.5))
                    .stop(4.0)
            })
            .collect(),
        SoundId::ChoirSwell => {
            let notes = [130.81, 164.81, 196.0, 261.63, 329.63, 392.0];
            let mut layers = Vec::new();
            for (i, hz) in notes.into_iter().enumerate() {
                for voice in 0..3 {
                    layers.push(
                        Layer::tone(Sine, hz * (1.0 + (voice as f32 - 1.0) * 0.004))
                            .detune(jitter(rng, 20.0))
                            .gain(swell(0.5, v * 0.08, 2.0, v * 0.12, 4.0))
                            .starting(i as f32 * 0.15)
                            .stop(4.5),
                    );
                }
            }
            layers
        }
        SoundId::Hallelujah => vec![Layer::osc(
            Saw,
            Curve::at(220.0).linear(1.0, 440.0).linear(2.0, 330.0),
        )
        .filter(
            FilterType::LowPass,
            Curve::at(500.0).linear(1.0, 2000.0).linear(2.0, 800.0),
            2.0,
        )
        .gain(Curve::at(0.0).linear(0.5, v * 0.3).linear(1.0, v * 0.4).linear(3.0, 0.0))
        .stop(3.5)],
        SoundId::DondaVocal => (0..6)
            .map(|i| {
                let waveform = if i % 2 == 0 { Sine } else { Triangle };
                let hz = 220.0 * (1.0 + i as f32 * 0.5) * (1.0 + jitter(rng, 0.02));
                Layer::tone(waveform, hz)
                    .bandpass(800.0 + i as f32 * 200.0, 5.0)
                    .gain(swell(0.1, v * 0.08, 1.5, v * 0.05, 2.5))
                    .stop(3.0)
            })
            .collect(),
        SoundId::SpiritualHum => (1..=6)
            .map(|h| {
                let h = h as f32;
                let level = v * 0.15 / h;
                Layer::tone(Sine, 110.0 * h)
                    .lfo(0.3, 110.0 * h * 0.005, LfoTarget::Frequency)
                    .gain(swell(1.0, level, 4.0, level * 0.8, 6.0))
                    .stop(6.5)
            })
            .collect(),
        SoundId::MonkChant => {
            let phrase = [(130.81, 1.0), (146.83, 0.5), (130.81, 1.5)];
            let mut layers = Vec::new();
            let mut at = 0.0;
            for (hz, dur) in phrase {
                for voice in 0..4 {
                    let spread = hz * (1.0 + (voice as f32 - 1.5) * 0.003);
                    layers.push(
                        Layer::tone(Sine, spread)
                            .gain(
                                Curve::at(0.0)
                                    .linear(0.1, v * 0.1)
                                    .set(dur - 0.1, v * 0.1)
                                    .linear(dur, 0.0),
                            )
                            .starting(at)
                            .stop(dur + 0.1),
                    );
                }
                at += dur;
            }
            layers
        }

        // ── adrenaline ────────────────────────────────────────────────
        SoundId::Scream => vec![Layer::osc(
            Saw,
            Curve::at(200.0).linear(0.1, 800.0).linear(0.5, 400.0),
        )
        .plus_tone(Square, 205.0)
        .shaper(ShaperCurve::Tanh(5.0))
        .gain(decay(v * 0.5, 0.8))
        .to(Bus::Compressor)],
        SoundId::IndustrialHit => vec![noise_burst(0.3, Contour::Flat)
            .bandpass(2000.0, 5.0)
            .shaper(ShaperCurve::Tanh(8.0))
            .gain(decay(v * 0.6, 0.3))
            .to(Bus::Compressor)],
        SoundId::GlitchBurst => (0..8)
            .map(|i| {
                Layer::tone(Square, 100.0 + rng.gen::<f32>() * 2000.0)
                    .gain(Curve::at(v * 0.3).set(0.02, 0.0))
                    .starting(i as f32 * 0.03)
                    .stop(0.03)
                    .to(Bus::Compressor)
            })
            .collect(),
        SoundId::Siren => vec![Layer::osc(
            Saw,
            Curve::at(600.0)
                .linear(0.5, 1200.0)
                .linear(1.0, 600.0)
                .linear(1.5, 1200.0),
        )
        .gain(
            Curve::at(0.0)
                .linear(0.1, v * 0.3)
                .set(1.4, v * 0.3)
                .linear(1.5, 0.0),
        )
        .stop(2.0)
        .to(Bus::Filter)],
        SoundId::Alarm => staggered(
            vec![
                Layer::tone(Square, 880.0)
                    .gain(Curve::at(v * 0.3).set(0.1, 0.0))
                    .stop(0.15)
                    .to(Bus::Compressor);
                4
            ],
            0.2,
        ),
        SoundId::Laser => vec![sweep(Saw, 3000.0, 100.0, 0.3)
            .gain(decay(v * 0.4, 0.3))
            .stop(0.5)],
        SoundId::PowerUp => vec![sweep(Sine, 200.0, 2000.0, 0.5)
            .gain(Curve::at(v * 0.4).linear(0.4, v * 0.5).exp(0.6, FAINT))
            .stop(0.7)],
        SoundId::DistortedBass => vec![Layer::tone(Saw, 55.0)
            .shaper(ShaperCurve::Tanh(10.0))
            .gain(decay(v * 0.6, 0.8))
            .to(Bus::Compressor)],

        // ── atmosphere ────────────────────────────────────────────────
        SoundId::SpaceAmbience => [55.0, 82.5, 110.0, 165.0]
            .into_iter()
            .enumerate()
            .map(|(i, hz)| {
                Layer::tone(Sine, hz)
                    .lfo(0.05 + i as f32 * 0.02, hz * 0.02, LfoTarget::Frequency)
                    .gain(swell(2.0, v * 0.1, 5.0, v * 0.08, 8.0))
                    .stop(8.5)
            })
            .collect(),
        SoundId::Nebula => vec![Layer::noise(
            NoiseColor::White,
            0.3,
            6.0,
            Contour::Swirl { a: 0.5, b: 0.3 },
        )
        .bandpass(500.0, 0.5)
        .lfo(0.1, 300.0, LfoTarget::Cutoff)
        .gain(swell(1.0, v, 5.0, v * 0.7, 6.0))],
        SoundId::Wormhole => vec![Layer::osc(
            Saw,
            Curve::at(50.0).exp(1.0, 2000.0).exp(2.0, 50.0),
        )
        .plus(Saw, Curve::at(52.0).exp(1.0, 2010.0).exp(2.0, 52.0))
        .filter(
            FilterType::LowPass,
            Curve::at(100.0).exp(1.0, 8000.0).exp(2.0, 100.0),
            5.0,
        )
        .gain(swell(0.5, v * 0.5, 1.0, v * 0.6, 2.2))
        .stop(2.5)],
        SoundId::CosmicPad => [65.41, 98.0, 130.81, 196.0]
            .into_iter()
            .enumerate()
            .flat_map(|(i, hz)| {
                let gain = swell(1.0, v * 0.12, 4.0, v * 0.08, 6.0);
                [
                    Layer::tone(Sine, hz)
                        .lfo(0.1 + i as f32 * 0.05, hz * 0.01, LfoTarget::Frequency)
                        .gain(gain.clone())
                        .stop(6.5),
                    Layer::tone(Triangle, hz * 1.002).gain(gain).stop(6.5),
                ]
            })
            .collect(),
        SoundId::StarDust => (0..20)
            .map(|_| {
                let start = rng.gen::<f32>() * 3.0;
                let hz = 1000.0 + rng.gen::<f32>() * 4000.0;
                let fade = 0.5 + rng.gen::<f32>() * 0.5;
                Layer::tone(Sine, hz)
                    .gain(Curve::at(0.0).linear(0.05, v * 0.1).exp(fade, FAINT))
                    .starting(start)
                    .stop(1.5)
            })
            .collect(),
        SoundId::BlackHole => vec![Layer::osc(Saw, Curve::at(30.0).linear(4.0, 20.0))
            .lowpass(200.0, 10.0)
            .gain(swell(1.0, v * 0.5, 3.0, v * 0.6, 5.0))
            .stop(5.5)
            .to(Bus::Compressor)],
        SoundId::Aurora => [261.63, 329.63, 392.0, 493.88, 587.33]
            .into_iter()
            .enumerate()
            .map(|(i, hz)| {
                Layer::tone(Sine, hz)
                    .lfo(2.0 + rng.gen::<f32>() * 3.0, 0.3, LfoTarget::Gain)
                    .gain(Curve::at(v * 0.08).set(3.0, v * 0.08).linear(4.0, 0.0))
                    .starting(i as f32 * 0.3)
                    .stop(4.1)
            })
            .collect(),
        SoundId::TimeWarp => vec![Layer::osc(
            Sine,
            Curve::at(800.0)
                .exp(0.5, 200.0)
                .exp(1.0, 1600.0)
                .exp(1.5, 400.0),
        )
        .gain(
            Curve::at(v * 0.4)
                .linear(0.75, v * 0.2)
                .linear(1.0, v * 0.4)
                .exp(1.8, FAINT),
        )
        .stop(2.0)],

        // ── impacts ───────────────────────────────────────────────────
        SoundId::BigImpact => vec![
            sweep(Sine, 80.0, 20.0, 0.5)
                .gain(decay(v, 1.5))
                .stop(2.0)
                .to(Bus::Compressor),
            noise_burst(0.5, Contour::Decay(20.0)).level(v * 0.5),
        ],
        SoundId::DropHit => vec![
            sweep(Sine, 150.0, 30.0, 0.2)
                .gain(decay(v, 0.8))
                .stop(1.0)
                .to(Bus::Compressor),
            Layer::tone(Square, 2000.0)
                .gain(decay(v * 0.4, 0.01))
                .stop(0.02)
                .to(Bus::Compressor),
        ],
        SoundId::Crash => vec![noise_burst(3.0, Contour::Decay(2.0))
            .highpass(5000.0)
            .level(v * 0.4)],
        SoundId::Gunshot => vec![
            sweep(Saw, 1500.0, 50.0, 0.05)
                .gain(decay(v * 0.8, 0.1))
                .stop(0.15)
                .to(Bus::Compressor),
            noise_burst(0.1, Contour::Flat)
                .gain(decay(v * 0.3, 0.08))
                .to(Bus::Compressor),
        ],
        SoundId::Explosion => vec![
            sweep(Sine, 100.0, 20.0, 0.3)
                .gain(decay(v, 1.0))
                .stop(1.2)
                .to(Bus::Compressor),
            noise_burst(1.0, Contour::Decay(3.0))
                .filter(FilterType::LowPass, Curve::at(8000.0).exp(0.5, 200.0), 1.0)
                .level(v * 0.5),
        ],
        SoundId::Punch => vec![sweep(Sine, 300.0, 60.0, 0.08)
            .gain(decay(v * 0.8, 0.2))
            .stop(0.3)
            .to(Bus::Compressor)],
        SoundId::Whoosh => vec![noise_burst(0.8, Contour::Arch)
            .filter(
                FilterType::BandPass,
                Curve::at(500.0).exp(0.4, 4000.0).exp(0.8, 500.0),
                2.0,
            )
            .level(v * 0.5)],
        SoundId::RiserImpact => {
            let mut layers = vec![sweep(Saw, 100.0, 2000.0, 1.5)
                .gain(Curve::at(0.0).linear(1.4, v * 0.4).set(1.5, 0.0))
                .stop(1.6)
                .to(Bus::Filter)];
            layers.extend(delayed(recipe(SoundId::BigImpact, v, rng), 1.5));
            layers
        }

        // ── synths ────────────────────────────────────────────────────
        SoundId::SynthStab => vec![tonal_stack(Saw, [261.63, 329.63, 392.0])
            .plus_tone(Square, 261.63 * 1.005)
            .plus_tone(Square, 329.63 * 1.005)
            .plus_tone(Square, 392.0 * 1.005)
            .gain(decay(v * 0.25, 0.3))
            .stop(0.4)
            .to(Bus::Filter)],
        SoundId::FutureBass => vec![tonal_stack(Saw, LOW_C_CHORD)
            .filter(
                FilterType::LowPass,
                Curve::at(500.0).linear(0.1, 4000.0).linear(0.3, 1000.0),
                5.0,
            )
            .gain(decay(v * 0.2, 0.5))
            .stop(0.6)],
        SoundId::Pluck => vec![Layer::tone(Saw, 440.0)
            .filter(FilterType::LowPass, Curve::at(8000.0).exp(0.1, 500.0), 1.0)
            .gain(decay(v * 0.5, 0.3))
            .stop(0.4)],
        SoundId::Arp => staggered(
            [261.63, 329.63, 392.0, 523.25, 392.0, 329.63]
                .into_iter()
                .map(|hz| {
                    Layer::tone(Square, hz)
                        .gain(decay(v * 0.2, 0.1))
                        .stop(0.15)
                })
                .collect(),
            0.08,
        ),
        SoundId::Reese => vec![tonal_stack(Saw, [55.0, 55.5])
            .gain(decay(v * 0.5, 0.8))
            .to(Bus::Compressor)],
        SoundId::Lead => vec![Layer::tone(Saw, 523.25)
            .plus_tone(Square, 1046.5)
            .gain(Curve::at(v * 0.3).linear(0.1, v * 0.2).exp(0.4, FAINT))
            .stop(0.5)
            .to(Bus::Filter)],
        SoundId::Hoover => (0..5)
            .map(|i| {
                let spread = 1.0 + i as f32 * 0.01;
                Layer::osc(
                    Saw,
                    Curve::at(130.81 * spread)
                        .linear(0.1, 150.0 * spread)
                        .linear(0.3, 130.81 * spread),
                )
                .detune((i as f32 - 2.0) * 20.0)
                .gain(decay(v * 0.12, 0.5))
                .stop(0.6)
                .to(Bus::Filter)
            })
            .collect(),
        SoundId::ChipTune => staggered(
            [523.25, 659.25, 783.99, 1046.5]
                .into_iter()
                .map(|hz| {
                    Layer::tone(Square, hz)
                        .gain(Curve::at(v * 0.15).set(0.08, 0.0))
                        .stop(0.1)
                        .to(Bus::Master)
                })
                .collect(),
            0.1,
        ),

        // ── ethereal ──────────────────────────────────────────────────
        SoundId::Riser => vec![sweep(Saw, 80.0, 2000.0, 2.0)
            .plus(Saw, Curve::at(82.0).exp(2.0, 2010.0))
            .filter(FilterType::LowPass, Curve::at(200.0).exp(2.0, 8000.0), 5.0)
            .gain(Curve::at(0.0).linear(0.5, v * 0.4).linear(1.8, v * 0.6).linear(2.2, 0.0))
            .stop(2.5)],
        SoundId::Downlifter => vec![sweep(Saw, 2000.0, 40.0, 2.0)
            .filter(FilterType::LowPass, Curve::at(8000.0).exp(2.0, 100.0), 1.0)
            .gain(decay(v * 0.5, 2.5))
            .stop(3.0)],
        SoundId::Atmosphere => {
            let mut pad = Vec::new();
            for hz in LOW_C_CHORD {
                for j in 0..3 {
                    pad.push(hz * (1.0 + (j as f32 - 1.0) * 0.003));
                }
            }
            let mut layer = tonal_stack(Sine, pad.iter().copied().take(1));
            for &hz in &pad[1..] {
                layer = layer.plus_tone(Sine, hz).detune(jitter(rng, 20.0));
            }
            vec![layer
                .gain(swell(1.0, v * 0.15, 3.0, v * 0.1, 5.0))
                .stop(5.5)]
        }
        SoundId::Sparkle => (0..12)
            .map(|i| {
                let start = i as f32 * 0.05 + rng.gen::<f32>() * 0.03;
                let hz = 3000.0 + rng.gen::<f32>() * 4000.0;
                let fade = 0.3 + rng.gen::<f32>() * 0.4;
                Layer::tone(Sine, hz)
                    .gain(decay(v * 0.15, fade))
                    .starting(start)
                    .stop(1.0)
            })
            .collect(),
        SoundId::GhostVoice => [700.0, 1200.0, 2500.0]
            .into_iter()
            .enumerate()
            .map(|(i, hz)| {
                let level = v / (i + 1) as f32;
                Layer::tone(Sine, hz)
                    .lfo(5.0 + rng.gen::<f32>() * 2.0, hz * 0.02, LfoTarget::Frequency)
                    .gain(swell(0.3, level * 0.12, 1.5, level * 0.08, 3.0))
                    .stop(3.5)
            })
            .collect(),
        SoundId::WindChime => [523.25, 659.25, 783.99, 1046.5, 1318.5]
            .into_iter()
            .map(|hz| {
                Layer::tone(Sine, hz)
                    .gain(decay(v * 0.2, 2.0))
                    .starting(rng.gen::<f32>() * 0.3)
                    .stop(2.5)
            })
            .collect(),
        SoundId::Drone => (0..5)
            .map(|i| {
                let waveform = if i == 0 { Sine } else { Triangle };
                let level = v * 0.15 / (i + 1) as f32;
                Layer::tone(waveform, 55.0 * (i + 1) as f32)
                    .lfo(0.1 + rng.gen::<f32>() * 0.2, 55.0 * 0.01, LfoTarget::Frequency)
                    .gain(swell(1.0, level, 4.0, level * (0.1 / 0.15), 6.0))
                    .stop(6.5)
            })
            .collect(),
        SoundId::Reverse => vec![noise_burst(2.0, Contour::Rise(3.0))
            .highpass(2000.0)
            .level(v * 0.4)],

        // ── soul ──────────────────────────────────────────────────────
        SoundId::Sub808 => vec![sweep(Sine, 80.0, 30.0, 0.3)
            .gain(decay(v, 1.5))
            .stop(2.0)
            .to(Bus::Compressor)],
        SoundId::Slide808 => vec![Layer::osc(Sine, Curve::at(120.0).exp(0.1, 40.0).exp(0.8, 30.0))
            .gain(decay(v, 1.2))
            .stop(1.5)
            .to(Bus::Compressor)],
        SoundId::SoulSample => C_MAJOR_7
            .into_iter()
            .map(|hz| {
                Layer::tone(Triangle, hz)
                    .detune(jitter(rng, 15.0))
                    .lfo(0.5, 3.0, LfoTarget::Detune)
                    .gain(decay(v * 0.2, 0.4))
                    .stop(0.5)
                    .to(Bus::Distortion)
            })
            .collect(),
        SoundId::VinylCrackle => vec![Layer::noise(NoiseColor::Crackle, 1.0, 3.0, Contour::Flat)
            .bandpass(1000.0, 0.5)
            .level(v)
            .to(Bus::Master)],
        SoundId::Chop => formant(
            Layer::tone(Saw, 220.0)
                .gain(decay(v * 0.15, 0.15))
                .stop(0.2),
            &[800.0, 1150.0, 2800.0],
            15.0,
        ),
        SoundId::Brass => vec![tonal_stack(Saw, [146.83, 185.0, 220.0])
            .plus_tone(Square, 146.83)
            .plus_tone(Square, 185.0)
            .plus_tone(Square, 220.0)
            .gain(Curve::at(0.0).linear(0.02, v * 0.25).exp(0.5, FAINT))
            .stop(0.6)
            .to(Bus::Filter)],
        SoundId::OrchHit => vec![
            tonal_stack(Saw, [65.41, 130.81])
                .plus_tone(Triangle, 196.0)
                .plus_tone(Triangle, 261.63)
                .plus_tone(Triangle, 329.63)
                .gain(decay(v * 0.2, 0.8))
                .stop(1.0),
            noise_burst(0.1, Contour::Flat)
                .gain(decay(v * 0.2, 0.05))
                .to(Bus::Compressor),
        ],
        SoundId::PianoChop => vec![tonal_stack(Triangle, [261.63, 311.13, 392.0])
            .plus_tone(Sine, 261.63 * 2.0)
            .plus_tone(Sine, 311.13 * 2.0)
            .plus_tone(Sine, 392.0 * 2.0)
            .gain(Curve::at(v * 0.2).exp(0.1, v * 0.05).exp(0.8, FAINT))
            .stop(1.0)],

        // ── ambient ───────────────────────────────────────────────────
        SoundId::Rain => vec![Layer::noise(NoiseColor::Rain, 1.0, 4.0, Contour::Flat)
            .bandpass(3000.0, 0.3)
            .gain(swell(0.5, v, 3.0, v * 0.8, 4.0))],
        SoundId::Thunder => vec![noise_burst(
            3.0,
            Contour::Rumble {
                decay: 1.5,
                rate: 3.0,
            },
        )
        .lowpass(150.0, 1.0)
        .level(v)],
        SoundId::Wind => vec![noise_burst(5.0, Contour::Swells(&WIND_SWELL))
            .bandpass(800.0, 0.5)
            .lfo(0.2, 400.0, LfoTarget::Cutoff)
            .gain(swell(1.0, v, 4.0, v * 0.7, 5.0))],
        SoundId::Birds => (0..5)
            .map(|_| {
                let start = rng.gen::<f32>() * 2.0;
                let base = 2000.0 + rng.gen::<f32>() * 2000.0;
                Layer::osc(
                    Sine,
                    Curve::at(base).linear(0.05, base * 1.2).linear(0.1, base * 0.9),
                )
                .gain(Curve::at(0.0).linear(0.02, v * 0.15).exp(0.15, FAINT))
                .starting(start)
                .stop(0.2)
            })
            .collect(),
        SoundId::Ocean => vec![noise_burst(6.0, Contour::Swells(&OCEAN_WAVES))
            .lowpass(1000.0, 1.0)
            .gain(swell(1.0, v, 5.0, v * 0.8, 6.0))],
        SoundId::Heartbeat => [(0.0, 0.6), (0.25, 0.4)]
            .into_iter()
            .map(|(at, level)| {
                sweep(Sine, 60.0, 30.0, 0.15)
                    .gain(decay(v * level, 0.2))
                    .starting(at)
                    .stop(0.3)
                    .to(Bus::Compressor)
            })
            .collect(),
        SoundId::Breath => vec![noise_burst(3.0, Contour::Flat)
            .filter(
                FilterType::BandPass,
                Curve::at(300.0).linear(1.0, 1500.0).linear(2.0, 800.0).linear(3.0, 300.0),
                2.0,
            )
            .gain(swell(0.5, v, 1.5, v * 0.6, 3.0))],
    }
}

fn hi_hat(v: f32, length: f32) -> Recipe {
    vec![noise_burst(length, Contour::Flat)
        .bandpass(10_000.0, 1.0)
        .gain(decay(v * 0.3, length))
        .to(Bus::Compressor)]
}
