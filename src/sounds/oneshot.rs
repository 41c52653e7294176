use crate::dsp::automation::AutomationParam;
use crate::dsp::distortion::ShaperCurve;
use crate::dsp::filter::SVFilter;
use crate::dsp::oscillator::{cents_to_ratio, NoiseSource, Oscillator, Waveform};
use crate::graph::node::RenderCtx;
use crate::graph::signal_graph::{Bus, BusBuffers};
use crate::sounds::recipe::{duration, Contour, Lfo, LfoTarget, NoiseColor, Recipe, Source};
use crate::sounds::SoundId;

/*
One-Shot Rendering
==================

Each layer of a recipe becomes a small fixed chain, live only inside its
window [start, start + stop):

  osc / noise ─┐
  osc / noise ─┼─> (+) ─> [filter] ─> [shaper] ─> [gain] ─> bus
       ...     ─┘              ^                     ^
                               └────── lfo ──────────┘ (one target)

Curves were anchored to the trigger time when the one-shot was built, so
rendering only has to sample them. Outside its window a layer writes
nothing; the last window to close marks the one-shot as finished.
*/

const WINDOW_SLACK: f64 = 1e-4;

enum SourceState {
    Osc {
        osc: Oscillator,
        frequency: AutomationParam,
        detune_cents: f32,
    },
    Noise {
        noise: NoiseSource,
        color: NoiseColor,
        level: f32,
        length: f32,
        contour: Contour,
    },
}

impl SourceState {
    fn noise_sample(noise: &mut NoiseSource, color: NoiseColor) -> f32 {
        match color {
            NoiseColor::White => noise.next_sample(),
            NoiseColor::Crackle => {
                let p = noise.chance();
                let spread = if p < 0.001 {
                    0.5
                } else if p < 0.01 {
                    0.1
                } else {
                    0.02
                };
                noise.next_sample() * spread
            }
            NoiseColor::Rain => {
                let drop = if noise.chance() < 0.0005 {
                    (noise.chance() - 0.5) * 0.8
                } else {
                    0.0
                };
                noise.next_sample() * 0.5 + drop
            }
        }
    }
}

struct LayerState {
    sources: Vec<SourceState>,
    filter: Option<(SVFilter, AutomationParam)>,
    shaper: Option<ShaperCurve>,
    lfo: Option<(Oscillator, Lfo)>,
    gain: AutomationParam,
    start: f64,
    end: f64,
    bus: Bus,
}

impl LayerState {
    /// Sample range of this block the layer is live in.
    fn window(&self, ctx: &RenderCtx, len: usize) -> Option<(usize, usize)> {
        let sr = ctx.sample_rate as f64;
        // f32 recipe times carry rounding; don't let it leak a sample.
        let first = ((self.start - ctx.time) * sr - WINDOW_SLACK).ceil().max(0.0);
        let last = ((self.end - ctx.time) * sr - WINDOW_SLACK).ceil().min(len as f64);
        if last <= first {
            return None;
        }
        Some((first as usize, last as usize))
    }
}

/// Working buffers for one block, shared by every one-shot in flight.
pub struct ShotScratch {
    mix: Vec<f32>,
    curve: Vec<f32>,
    lfo: Vec<f32>,
}

impl ShotScratch {
    pub fn new(block_size: usize) -> Self {
        Self {
            mix: vec![0.0; block_size],
            curve: vec![0.0; block_size],
            lfo: vec![0.0; block_size],
        }
    }
}

/// A triggered library sound rendering straight into the graph's buses.
pub struct OneShot {
    id: SoundId,
    layers: Vec<LayerState>,
    ends_at: f64,
}

impl OneShot {
    /// Anchor `recipe` at engine time `now`. `seed` drives the noise sources.
    pub fn new(id: SoundId, recipe: Recipe, now: f64, seed: u64) -> Self {
        let ends_at = now + duration(&recipe) as f64;
        let mut noise_seed = seed;

        let layers = recipe
            .into_iter()
            .map(|layer| {
                let origin = now + layer.start as f64;
                let sources = layer
                    .sources
                    .iter()
                    .map(|source| match source {
                        Source::Osc {
                            waveform,
                            frequency,
                            detune_cents,
                        } => SourceState::Osc {
                            osc: Oscillator::new(*waveform),
                            frequency: frequency.instantiate(origin),
                            detune_cents: *detune_cents,
                        },
                        Source::Noise {
                            color,
                            level,
                            length,
                            contour,
                        } => {
                            noise_seed = noise_seed.wrapping_add(1);
                            SourceState::Noise {
                                noise: NoiseSource::new(noise_seed),
                                color: *color,
                                level: *level,
                                length: *length,
                                contour: *contour,
                            }
                        }
                    })
                    .collect();

                LayerState {
                    sources,
                    filter: layer.filter.as_ref().map(|f| {
                        (
                            SVFilter::new(f.kind, f.cutoff.initial(), f.q),
                            f.cutoff.instantiate(origin),
                        )
                    }),
                    shaper: layer.shaper,
                    lfo: layer.lfo.map(|lfo| (Oscillator::new(Waveform::Sine), lfo)),
                    gain: layer.gain.instantiate(origin),
                    start: origin,
                    end: origin + layer.stop as f64,
                    bus: layer.bus,
                }
            })
            .collect();

        Self {
            id,
            layers,
            ends_at,
        }
    }

    pub fn id(&self) -> SoundId {
        self.id
    }

    /// Engine time at which the last layer stops.
    pub fn ends_at(&self) -> f64 {
        self.ends_at
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.ends_at
    }

    /// Add this block's output to the layers' buses.
    pub fn render(&mut self, buses: &mut BusBuffers, scratch: &mut ShotScratch, ctx: &RenderCtx) {
        let len = buses.len().min(scratch.mix.len());
        let sr = ctx.sample_rate;
        let block_end = ctx.end_time(len);

        for layer in &mut self.layers {
            let Some((a, b)) = layer.window(ctx, len) else {
                continue;
            };
            let mix = &mut scratch.mix[a..b];
            let curve = &mut scratch.curve[..len];
            let lfo = &mut scratch.lfo[a..b];
            mix.fill(0.0);

            let lfo_target = match &mut layer.lfo {
                Some((osc, settings)) => {
                    for value in lfo.iter_mut() {
                        *value = osc.next_sample(settings.rate, sr) * settings.depth;
                    }
                    Some(settings.target)
                }
                None => None,
            };

            for source in &mut layer.sources {
                match source {
                    SourceState::Osc {
                        osc,
                        frequency,
                        detune_cents,
                    } => {
                        frequency.render(curve, ctx.time, sr);
                        let ratio = cents_to_ratio(*detune_cents);
                        for (i, out) in mix.iter_mut().enumerate() {
                            let mut hz = curve[a + i] * ratio;
                            match lfo_target {
                                Some(LfoTarget::Frequency) => hz += lfo[i],
                                Some(LfoTarget::Detune) => hz *= cents_to_ratio(lfo[i]),
                                _ => {}
                            }
                            *out += osc.next_sample(hz.max(0.0), sr);
                        }
                        frequency.prune(block_end);
                    }
                    SourceState::Noise {
                        noise,
                        color,
                        level,
                        length,
                        contour,
                    } => {
                        for (i, out) in mix.iter_mut().enumerate() {
                            let t = (ctx.sample_time(a + i) - layer.start) as f32;
                            if t >= *length {
                                break;
                            }
                            let sample = SourceState::noise_sample(noise, *color);
                            *out += sample * *level * contour.level(t, *length);
                        }
                    }
                }
            }

            if let Some((filter, cutoff)) = &mut layer.filter {
                cutoff.render(curve, ctx.time, sr);
                for (i, sample) in mix.iter_mut().enumerate() {
                    let mut hz = curve[a + i];
                    if lfo_target == Some(LfoTarget::Cutoff) {
                        hz += lfo[i];
                    }
                    *sample = filter.process_at(*sample, hz, sr);
                }
                cutoff.prune(block_end);
            }

            if let Some(shaper) = layer.shaper {
                shaper.apply_buffer(mix);
            }

            layer.gain.render(curve, ctx.time, sr);
            for (i, sample) in mix.iter_mut().enumerate() {
                let mut gain = curve[a + i];
                if lfo_target == Some(LfoTarget::Gain) {
                    gain *= 1.0 + lfo[i];
                }
                *sample *= gain;
            }
            layer.gain.prune(block_end);

            for (dst, src) in buses.bus_mut(layer.bus)[a..b].iter_mut().zip(mix.iter()) {
                *dst += src;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_BLOCK_SIZE;
    use crate::sounds::catalog;
    use crate::sounds::recipe::{Curve, Layer};
    use rand::{rngs::StdRng, SeedableRng};

    const SR: f32 = 48_000.0;

    fn play(id: SoundId) -> OneShot {
        let mut rng = StdRng::seed_from_u64(7);
        OneShot::new(id, catalog::recipe(id, 1.0, &mut rng), 0.0, 7)
    }

    fn scratch() -> ShotScratch {
        ShotScratch::new(MAX_BLOCK_SIZE)
    }

    fn energy(signal: &[f32]) -> f32 {
        signal.iter().map(|s| s * s).sum()
    }

    #[test]
    fn test_kick_lands_on_compressor_bus_only() {
        let mut kick = play(SoundId::Kick);
        let mut buses = BusBuffers::new(512);
        buses.clear(512);

        kick.render(&mut buses, &mut scratch(), &RenderCtx::new(SR, 0.0));

        assert!(energy(buses.bus(Bus::Compressor)) > 1.0);
        for bus in [Bus::Filter, Bus::Reverb, Bus::Distortion, Bus::Master] {
            assert_eq!(energy(buses.bus(bus)), 0.0);
        }
    }

    #[test]
    fn test_layer_waits_for_its_start() {
        let recipe = vec![Layer::tone(Waveform::Square, 440.0)
            .starting(0.005)
            .stop(0.1)
            .to(Bus::Filter)];
        let mut shot = OneShot::new(SoundId::Lead, recipe, 1.0, 0);
        let mut buses = BusBuffers::new(512);
        buses.clear(512);

        shot.render(&mut buses, &mut scratch(), &RenderCtx::new(SR, 1.0));

        let out = buses.bus(Bus::Filter);
        assert!(out[..240].iter().all(|s| *s == 0.0));
        assert_eq!(out[240].abs(), 1.0);
    }

    #[test]
    fn test_silent_after_stop() {
        let recipe = vec![Layer::tone(Waveform::Square, 440.0)
            .gain(Curve::at(0.5))
            .stop(0.001)];
        let mut shot = OneShot::new(SoundId::Lead, recipe, 0.0, 0);
        let mut buses = BusBuffers::new(256);
        buses.clear(256);

        shot.render(&mut buses, &mut scratch(), &RenderCtx::new(SR, 0.0));

        let out = buses.bus(Bus::Reverb);
        assert!(out[..48].iter().all(|s| s.abs() == 0.5));
        assert!(out[48..].iter().all(|s| *s == 0.0));
        assert!(shot.is_finished(0.002));
    }

    #[test]
    fn test_crackle_goes_to_master() {
        let mut crackle = play(SoundId::VinylCrackle);
        let mut buses = BusBuffers::new(2048);
        buses.clear(2048);

        crackle.render(&mut buses, &mut scratch(), &RenderCtx::new(SR, 0.0));

        assert!(energy(buses.bus(Bus::Master)) > 0.0);
        assert!(buses.bus(Bus::Master).iter().all(|s| s.abs() <= 1.0));
        assert_eq!(crackle.ends_at(), 3.0);
    }

    #[test]
    fn test_every_sound_renders_finite_audio() {
        // low rate keeps the full library pass quick
        let sr = 16_000.0;
        let mut buses = BusBuffers::new(MAX_BLOCK_SIZE);
        let mut scratch = scratch();
        for id in SoundId::ALL {
            let mut shot = play(id);
            let mut time = 0.0;
            while !shot.is_finished(time) {
                buses.clear(MAX_BLOCK_SIZE);
                let ctx = RenderCtx::new(sr, time);
                shot.render(&mut buses, &mut scratch, &ctx);
                for bus in Bus::ALL {
                    assert!(
                        buses.bus(bus).iter().all(|s| s.is_finite() && s.abs() < 8.0),
                        "{:?} blew up on {:?}",
                        id,
                        bus
                    );
                }
                time = ctx.end_time(MAX_BLOCK_SIZE);
            }
        }
    }
}
