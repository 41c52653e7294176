//! The instrument's parameter set: twelve unit-range knobs plus the
//! categorical selectors.
//!
//! Every write clamps. Nothing here can fail, so setters are safe to call
//! before the engine has a graph to apply them to.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::signal_graph::EffectSettings;
use crate::sequencing::clock::{clamp_bpm, DEFAULT_BPM};
use crate::sequencing::scale::ScaleMode;
use crate::synth::recipe::{Envelope, VoiceType};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Reverb,
    Delay,
    Filter,
    Shimmer,
    Warmth,
    Space,
    Attack,
    Decay,
    Sustain,
    Release,
    Master,
    Drive,
}

impl Param {
    pub const COUNT: usize = 12;

    pub const ALL: [Param; Self::COUNT] = [
        Param::Reverb,
        Param::Delay,
        Param::Filter,
        Param::Shimmer,
        Param::Warmth,
        Param::Space,
        Param::Attack,
        Param::Decay,
        Param::Sustain,
        Param::Release,
        Param::Master,
        Param::Drive,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Param::Reverb => "reverb",
            Param::Delay => "delay",
            Param::Filter => "filter",
            Param::Shimmer => "shimmer",
            Param::Warmth => "warmth",
            Param::Space => "space",
            Param::Attack => "attack",
            Param::Decay => "decay",
            Param::Sustain => "sustain",
            Param::Release => "release",
            Param::Master => "master",
            Param::Drive => "drive",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|param| param.name().eq_ignore_ascii_case(name))
    }

    pub fn default_value(self) -> f32 {
        match self {
            Param::Reverb => 0.5,
            Param::Delay => 0.3,
            Param::Filter => 0.7,
            Param::Shimmer => 0.6,
            Param::Warmth => 0.45,
            Param::Space => 0.75,
            Param::Attack => 0.3,
            Param::Decay => 0.4,
            Param::Sustain => 0.7,
            Param::Release => 0.8,
            Param::Master => 0.75,
            Param::Drive => 0.2,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Clamp to [0, 1]. NaN maps to the lower bound.
#[inline]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    values: [f32; Param::COUNT],
    pub voice_type: VoiceType,
    pub scale_mode: ScaleMode,
    bpm: f32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            values: Param::ALL.map(Param::default_value),
            voice_type: VoiceType::default(),
            scale_mode: ScaleMode::default(),
            bpm: DEFAULT_BPM,
        }
    }
}

impl ParameterSet {
    pub fn get(&self, param: Param) -> f32 {
        self.values[param.index()]
    }

    /// Store `value` clamped to [0, 1] and return what was stored.
    pub fn set(&mut self, param: Param, value: f32) -> f32 {
        let value = clamp_unit(value);
        self.values[param.index()] = value;
        value
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f32) -> f32 {
        self.bpm = clamp_bpm(bpm);
        self.bpm
    }

    /// Envelope for a pad note of the current voice type.
    pub fn envelope(&self) -> Envelope {
        self.voice_type.custom_envelope().unwrap_or_else(|| {
            Envelope::from_knobs(
                self.get(Param::Attack),
                self.get(Param::Decay),
                self.get(Param::Sustain),
                self.get(Param::Release),
            )
        })
    }

    pub fn effect_settings(&self) -> EffectSettings {
        EffectSettings {
            reverb: self.get(Param::Reverb),
            delay: self.get(Param::Delay),
            filter: self.get(Param::Filter),
            shimmer: self.get(Param::Shimmer),
            warmth: self.get(Param::Warmth),
            space: self.get(Param::Space),
            master: self.get(Param::Master),
            drive: self.get(Param::Drive),
            bpm: self.bpm,
        }
    }
}
