//! Voice types: oscillator recipes, gain weighting and envelopes.
//!
//! Each voice type is a fixed harmonic/detune recipe. A few carry a small
//! random detune so stacked notes never phase-lock; the randomness comes
//! from the engine's seeded RNG.

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::Waveform;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VoiceType {
    #[default]
    Pad,
    Bell,
    String,
    Choir,
    Soul,
    Gospel,
    Vox,
    Glass,
    Dream,
}

/// ADSR times in seconds; `sustain` is a fraction of the velocity.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Envelope {
    pub const fn new(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Envelope derived from the four normalized envelope knobs.
    pub fn from_knobs(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        Self {
            attack: 0.01 + attack * 0.5,
            decay: 0.1 + decay * 0.5,
            sustain: sustain * 0.7,
            release: 0.2 + release * 2.0,
        }
    }

    /// Keyboard notes: quick attack, hold at velocity.
    pub const KEYBOARD: Self = Self::new(0.02, 0.0, 1.0, 0.5);
}

/// One oscillator of a voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partial {
    pub waveform: Waveform,
    /// Multiple of the note frequency.
    pub ratio: f32,
    pub detune_cents: f32,
}

impl Partial {
    const fn new(waveform: Waveform, ratio: f32, detune_cents: f32) -> Self {
        Self {
            waveform,
            ratio,
            detune_cents,
        }
    }

    const fn sine(ratio: f32) -> Self {
        Self::new(Waveform::Sine, ratio, 0.0)
    }
}

const BELL_PARTIALS: [f32; 7] = [1.0, 2.0, 2.4, 3.0, 4.2, 5.4, 6.8];
const GLASS_PARTIALS: [f32; 5] = [1.0, 2.76, 5.4, 8.93, 13.34];
const GOSPEL_DRAWBARS: [f32; 7] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 8.0];
const GOSPEL_DRAWBAR_LEVELS: [f32; 7] = [1.0, 0.8, 0.6, 0.5, 0.4, 0.3, 0.2];
/// "ah" vowel formants, relative to A4.
const VOX_FORMANTS: [f32; 3] = [730.0, 1090.0, 2440.0];

fn jitter<R: Rng>(rng: &mut R, span: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * span
}

impl VoiceType {
    pub const ALL: [VoiceType; 9] = [
        VoiceType::Pad,
        VoiceType::Bell,
        VoiceType::String,
        VoiceType::Choir,
        VoiceType::Soul,
        VoiceType::Gospel,
        VoiceType::Vox,
        VoiceType::Glass,
        VoiceType::Dream,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VoiceType::Pad => "pad",
            VoiceType::Bell => "bell",
            VoiceType::String => "string",
            VoiceType::Choir => "choir",
            VoiceType::Soul => "soul",
            VoiceType::Gospel => "gospel",
            VoiceType::Vox => "vox",
            VoiceType::Glass => "glass",
            VoiceType::Dream => "dream",
        }
    }

    /// Case-insensitive lookup; `None` for unknown names.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|voice| voice.name().eq_ignore_ascii_case(name))
    }

    /// Fixed envelope for voice types that ignore the envelope knobs.
    pub fn custom_envelope(self) -> Option<Envelope> {
        match self {
            VoiceType::Bell => Some(Envelope::new(0.01, 0.3, 0.2, 1.5)),
            VoiceType::Soul => Some(Envelope::new(0.02, 0.2, 0.5, 0.8)),
            VoiceType::Gospel => Some(Envelope::new(0.01, 0.1, 0.8, 0.3)),
            VoiceType::Vox => Some(Envelope::new(0.15, 0.3, 0.6, 1.2)),
            VoiceType::Glass => Some(Envelope::new(0.01, 0.5, 0.1, 2.0)),
            VoiceType::Dream => Some(Envelope::new(0.3, 0.5, 0.7, 2.5)),
            VoiceType::Pad | VoiceType::String | VoiceType::Choir => None,
        }
    }

    /// Keyboard notes only support a subset of the recipes.
    pub fn for_keyboard(self) -> Self {
        match self {
            VoiceType::Bell
            | VoiceType::String
            | VoiceType::Soul
            | VoiceType::Gospel
            | VoiceType::Glass => self,
            _ => VoiceType::Pad,
        }
    }

    /// Oscillator set for one note.
    pub fn partials<R: Rng>(self, rng: &mut R) -> Vec<Partial> {
        match self {
            VoiceType::Pad => {
                let mut partials: Vec<Partial> = [-12.0, -5.0, 0.0, 5.0, 12.0]
                    .into_iter()
                    .map(|cents| Partial::new(Waveform::Sine, 1.0, cents + jitter(rng, 5.0)))
                    .collect();
                partials.push(Partial::sine(0.5));
                partials
            }
            VoiceType::Bell => BELL_PARTIALS.into_iter().map(Partial::sine).collect(),
            VoiceType::String => vec![
                Partial::new(Waveform::Saw, 1.0, -7.0),
                Partial::new(Waveform::Saw, 1.0, 0.0),
                Partial::new(Waveform::Triangle, 1.0, 7.0),
            ],
            VoiceType::Choir => (0..5)
                .map(|i| {
                    Partial::new(Waveform::Sine, 1.0 + i as f32 * 0.008, jitter(rng, 25.0))
                })
                .collect(),
            VoiceType::Soul => {
                let mut partials = vec![Partial::sine(1.0)];
                for harmonic in 2..=5 {
                    partials.push(Partial::new(
                        Waveform::Sine,
                        harmonic as f32,
                        jitter(rng, 10.0),
                    ));
                }
                partials.push(Partial::new(Waveform::Triangle, 1.0, 8.0));
                partials
            }
            VoiceType::Gospel => GOSPEL_DRAWBARS.into_iter().map(Partial::sine).collect(),
            VoiceType::Vox => {
                let mut partials: Vec<Partial> = VOX_FORMANTS
                    .into_iter()
                    .map(|formant| Partial::sine(formant / 440.0))
                    .collect();
                partials.push(Partial::new(Waveform::Saw, 1.0, 0.0));
                partials
            }
            VoiceType::Glass => GLASS_PARTIALS.into_iter().map(Partial::sine).collect(),
            VoiceType::Dream => {
                let mut partials: Vec<Partial> = (0..8)
                    .map(|i| {
                        let spread = 1.0 + (i as f32 - 4.0) * 0.002;
                        Partial::new(Waveform::Sine, spread, jitter(rng, 30.0))
                    })
                    .collect();
                partials.push(Partial::sine(0.5));
                partials.push(Partial::sine(2.0));
                partials
            }
        }
    }

    /// Relative level of oscillator `index`, before the equal split.
    pub fn weight(self, index: usize) -> f32 {
        match self {
            VoiceType::Bell | VoiceType::Glass => 0.65_f32.powi(index as i32),
            VoiceType::Gospel => GOSPEL_DRAWBAR_LEVELS.get(index).copied().unwrap_or(0.2),
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(VoiceType::from_name("Gospel"), Some(VoiceType::Gospel));
        assert_eq!(VoiceType::from_name(" dream "), Some(VoiceType::Dream));
        assert_eq!(VoiceType::from_name("kazoo"), None);
    }

    #[test]
    fn test_partial_counts() {
        let mut rng = StdRng::seed_from_u64(7);
        let counts: Vec<usize> = VoiceType::ALL
            .iter()
            .map(|voice| voice.partials(&mut rng).len())
            .collect();
        assert_eq!(counts, vec![6, 7, 3, 5, 6, 7, 4, 5, 10]);
    }

    #[test]
    fn test_weights_follow_voice_character() {
        assert_eq!(VoiceType::Pad.weight(3), 1.0);
        assert!((VoiceType::Bell.weight(2) - 0.4225).abs() < 1e-6);
        assert_eq!(VoiceType::Gospel.weight(1), 0.8);
        assert_eq!(VoiceType::Gospel.weight(20), 0.2);
    }

    #[test]
    fn test_knob_envelope_mapping() {
        let env = Envelope::from_knobs(0.3, 0.4, 0.7, 0.8);
        assert!((env.attack - 0.16).abs() < 1e-6);
        assert!((env.decay - 0.3).abs() < 1e-6);
        assert!((env.sustain - 0.49).abs() < 1e-6);
        assert!((env.release - 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_keyboard_falls_back_to_pad() {
        assert_eq!(VoiceType::Vox.for_keyboard(), VoiceType::Pad);
        assert_eq!(VoiceType::Bell.for_keyboard(), VoiceType::Bell);
    }
}
