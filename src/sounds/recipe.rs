//! Data model for one-shot sounds.
//!
//! A [`Recipe`] is a list of [`Layer`]s. A layer sums one or more sources
//! (oscillators or a shaped noise burst) and runs them through an optional
//! filter and waveshaper, an LFO, a gain curve, a start offset, a stop time
//! and the bus it feeds.
//! Curves are written relative to the layer's own start and become
//! [`AutomationParam`]s anchored to the trigger time when the sound plays.

use crate::dsp::automation::AutomationParam;
use crate::dsp::distortion::ShaperCurve;
use crate::dsp::filter::FilterType;
use crate::dsp::oscillator::Waveform;
use crate::graph::signal_graph::Bus;

pub type Recipe = Vec<Layer>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Segment {
    Set,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CurvePoint {
    at: f32,
    value: f32,
    segment: Segment,
}

/// A parameter trajectory in seconds relative to a layer's start.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: Vec<CurvePoint>,
}

impl Curve {
    /// Starts at `value`.
    pub fn at(value: f32) -> Self {
        Self {
            points: vec![CurvePoint {
                at: 0.0,
                value,
                segment: Segment::Set,
            }],
        }
    }

    fn push(mut self, at: f32, value: f32, segment: Segment) -> Self {
        self.points.push(CurvePoint { at, value, segment });
        self
    }

    /// Jump to `value` at `at`.
    pub fn set(self, at: f32, value: f32) -> Self {
        self.push(at, value, Segment::Set)
    }

    /// Straight line to `value`, arriving at `at`.
    pub fn linear(self, at: f32, value: f32) -> Self {
        self.push(at, value, Segment::Linear)
    }

    /// Exponential glide to `value`, arriving at `at`.
    pub fn exp(self, at: f32, value: f32) -> Self {
        self.push(at, value, Segment::Exponential)
    }

    pub fn initial(&self) -> f32 {
        self.points.first().map_or(0.0, |p| p.value)
    }

    /// Time of the last scheduled point.
    pub fn end(&self) -> f32 {
        self.points.last().map_or(0.0, |p| p.at)
    }

    /// Every value multiplied by `factor`.
    pub fn scaled(mut self, factor: f32) -> Self {
        for point in &mut self.points {
            point.value *= factor;
        }
        self
    }

    /// Anchor the curve at `origin` seconds of engine time.
    pub fn instantiate(&self, origin: f64) -> AutomationParam {
        let mut param = AutomationParam::new(self.initial());
        for point in &self.points {
            let time = origin + point.at as f64;
            match point.segment {
                Segment::Set => param.set_value_at_time(point.value, time),
                Segment::Linear => param.linear_ramp_to_value_at_time(point.value, time),
                Segment::Exponential => {
                    param.exponential_ramp_to_value_at_time(point.value, time)
                }
            }
        }
        param
    }
}

/// Texture of a noise source before its contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseColor {
    White,
    /// Mostly hiss with sparse loud pops.
    Crackle,
    /// Soft hiss with occasional droplets.
    Rain,
}

/// Amplitude shape baked into a noise burst. `t` is in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contour {
    Flat,
    /// `(t / length)^power`: a reverse swell.
    Rise(f32),
    /// `exp(-rate * t)`.
    Decay(f32),
    /// `exp(-decay * t) * sin(rate * t)`: a rolling rumble.
    Rumble { decay: f32, rate: f32 },
    /// Product of slow sine swells.
    Swells(&'static [Swell]),
    /// `(sin(a * t) * cos(b * t)) * 0.5 + 0.5`.
    Swirl { a: f32, b: f32 },
    /// `sin(pi * t / length)`.
    Arch,
}

/// `sin(rate * t + phase) * depth + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swell {
    pub rate: f32,
    pub phase: f32,
    pub depth: f32,
    pub offset: f32,
}

impl Contour {
    pub fn level(&self, t: f32, length: f32) -> f32 {
        match *self {
            Contour::Flat => 1.0,
            Contour::Rise(power) => (t / length).clamp(0.0, 1.0).powf(power),
            Contour::Decay(rate) => (-rate * t).exp(),
            Contour::Rumble { decay, rate } => (-decay * t).exp() * (rate * t).sin(),
            Contour::Swells(swells) => swells
                .iter()
                .map(|s| (s.rate * t + s.phase).sin() * s.depth + s.offset)
                .product(),
            Contour::Swirl { a, b } => (a * t).sin() * (b * t).cos() * 0.5 + 0.5,
            Contour::Arch => (std::f32::consts::PI * t / length).sin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Osc {
        waveform: Waveform,
        frequency: Curve,
        detune_cents: f32,
    },
    Noise {
        color: NoiseColor,
        level: f32,
        length: f32,
        contour: Contour,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LfoTarget {
    /// Adds `depth` Hz to the oscillator frequency.
    Frequency,
    /// Adds `depth` cents of detune.
    Detune,
    /// Adds `depth` Hz to the filter cutoff.
    Cutoff,
    /// Scales the gain by `1 + depth * lfo`.
    Gain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lfo {
    pub rate: f32,
    pub depth: f32,
    pub target: LfoTarget,
}

impl Lfo {
    pub fn new(rate: f32, depth: f32, target: LfoTarget) -> Self {
        Self {
            rate,
            depth,
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerFilter {
    pub kind: FilterType,
    pub cutoff: Curve,
    pub q: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub sources: Vec<Source>,
    pub filter: Option<LayerFilter>,
    pub shaper: Option<ShaperCurve>,
    pub lfo: Option<Lfo>,
    pub gain: Curve,
    /// Seconds after the trigger.
    pub start: f32,
    /// Seconds after `start`.
    pub stop: f32,
    pub bus: Bus,
}

impl Layer {
    fn from_source(source: Source, stop: f32) -> Self {
        Self {
            sources: vec![source],
            filter: None,
            shaper: None,
            lfo: None,
            gain: Curve::at(1.0),
            start: 0.0,
            stop,
            bus: Bus::Reverb,
        }
    }

    pub fn osc(waveform: Waveform, frequency: Curve) -> Self {
        Self::from_source(
            Source::Osc {
                waveform,
                frequency,
                detune_cents: 0.0,
            },
            1.0,
        )
    }

    pub fn tone(waveform: Waveform, hz: f32) -> Self {
        Self::osc(waveform, Curve::at(hz))
    }

    /// Add another oscillator summed ahead of the filter and shaper.
    pub fn plus(mut self, waveform: Waveform, frequency: Curve) -> Self {
        self.sources.push(Source::Osc {
            waveform,
            frequency,
            detune_cents: 0.0,
        });
        self
    }

    pub fn plus_tone(self, waveform: Waveform, hz: f32) -> Self {
        self.plus(waveform, Curve::at(hz))
    }

    pub fn noise(color: NoiseColor, level: f32, length: f32, contour: Contour) -> Self {
        Self::from_source(
            Source::Noise {
                color,
                level,
                length,
                contour,
            },
            length,
        )
    }

    /// Detune the most recently added oscillator.
    pub fn detune(mut self, cents: f32) -> Self {
        if let Some(Source::Osc { detune_cents, .. }) = self.sources.last_mut() {
            *detune_cents = cents;
        }
        self
    }

    pub fn filter(mut self, kind: FilterType, cutoff: Curve, q: f32) -> Self {
        self.filter = Some(LayerFilter { kind, cutoff, q });
        self
    }

    pub fn lowpass(self, hz: f32, q: f32) -> Self {
        self.filter(FilterType::LowPass, Curve::at(hz), q)
    }

    pub fn highpass(self, hz: f32) -> Self {
        self.filter(FilterType::HighPass, Curve::at(hz), std::f32::consts::FRAC_1_SQRT_2)
    }

    pub fn bandpass(self, hz: f32, q: f32) -> Self {
        self.filter(FilterType::BandPass, Curve::at(hz), q)
    }

    pub fn shaper(mut self, curve: ShaperCurve) -> Self {
        self.shaper = Some(curve);
        self
    }

    pub fn lfo(mut self, rate: f32, depth: f32, target: LfoTarget) -> Self {
        self.lfo = Some(Lfo::new(rate, depth, target));
        self
    }

    pub fn gain(mut self, gain: Curve) -> Self {
        self.gain = gain;
        self
    }

    pub fn level(self, level: f32) -> Self {
        self.gain(Curve::at(level))
    }

    pub fn starting(mut self, start: f32) -> Self {
        self.start = start;
        self
    }

    pub fn stop(mut self, stop: f32) -> Self {
        self.stop = stop;
        self
    }

    pub fn to(mut self, bus: Bus) -> Self {
        self.bus = bus;
        self
    }

    /// Seconds after the trigger at which this layer falls silent.
    pub fn end(&self) -> f32 {
        self.start + self.stop
    }
}

/// Seconds after the trigger at which the whole recipe has stopped.
pub fn duration(recipe: &[Layer]) -> f32 {
    recipe.iter().map(Layer::end).fold(0.0, f32::max)
}

/// Shift every layer of `recipe` later by `offset` seconds.
pub fn delayed(mut recipe: Recipe, offset: f32) -> Recipe {
    for layer in &mut recipe {
        layer.start += offset;
    }
    recipe
}
