//! The one-shot sound library.
//!
//! Every sound is a closed [`SoundId`]. Playing one asks [`catalog`] for a
//! [`Recipe`](recipe::Recipe) (a list of layers with pre-computed curves) and
//! hands it to a [`OneShot`](oneshot::OneShot), which renders it straight
//! into the signal graph's buses until its last layer stops. One-shots are
//! never registered with the voice allocator and need no release.

pub mod catalog;
pub mod oneshot;
pub mod primitives;
pub mod recipe;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use oneshot::{OneShot, ShotScratch};
pub use recipe::{Curve, Layer, Recipe};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Drums,
    Choir,
    Adrenaline,
    Atmosphere,
    Impacts,
    Synths,
    Ethereal,
    Soul,
    Ambient,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SoundId {
    // drums (sequencer rows)
    Kick,
    Snare,
    ClosedHat,
    OpenHat,
    Clap,
    Rim,
    Perc,
    Shimmer,
    // choir
    HeavenlyChoir,
    GospelChoir,
    AngelVoice,
    ChoirSwell,
    Hallelujah,
    DondaVocal,
    SpiritualHum,
    MonkChant,
    // adrenaline
    Scream,
    IndustrialHit,
    GlitchBurst,
    Siren,
    Alarm,
    Laser,
    PowerUp,
    DistortedBass,
    // atmosphere
    SpaceAmbience,
    Nebula,
    Wormhole,
    CosmicPad,
    StarDust,
    BlackHole,
    Aurora,
    TimeWarp,
    // impacts
    BigImpact,
    DropHit,
    Crash,
    Gunshot,
    Explosion,
    Punch,
    Whoosh,
    RiserImpact,
    // synths
    SynthStab,
    FutureBass,
    Pluck,
    Arp,
    Reese,
    Lead,
    Hoover,
    ChipTune,
    // ethereal
    Riser,
    Downlifter,
    Atmosphere,
    Sparkle,
    GhostVoice,
    WindChime,
    Drone,
    Reverse,
    // soul
    Sub808,
    Slide808,
    SoulSample,
    VinylCrackle,
    Chop,
    Brass,
    OrchHit,
    PianoChop,
    // ambient
    Rain,
    Thunder,
    Wind,
    Birds,
    Ocean,
    Heartbeat,
    Breath,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Drums,
        Category::Choir,
        Category::Adrenaline,
        Category::Atmosphere,
        Category::Impacts,
        Category::Synths,
        Category::Ethereal,
        Category::Soul,
        Category::Ambient,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Drums => "drums",
            Category::Choir => "choir",
            Category::Adrenaline => "adrenaline",
            Category::Atmosphere => "atmosphere",
            Category::Impacts => "impacts",
            Category::Synths => "synths",
            Category::Ethereal => "ethereal",
            Category::Soul => "soul",
            Category::Ambient => "ambient",
        }
    }

    /// Sounds of this category in pad order.
    pub fn sounds(self) -> &'static [SoundId] {
        let (start, len) = match self {
            Category::Drums => (0, 8),
            Category::Choir => (8, 8),
            Category::Adrenaline => (16, 8),
            Category::Atmosphere => (24, 8),
            Category::Impacts => (32, 8),
            Category::Synths => (40, 8),
            Category::Ethereal => (48, 8),
            Category::Soul => (56, 8),
            Category::Ambient => (64, 7),
        };
        &SoundId::ALL[start..start + len]
    }

    /// The category after this one, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl SoundId {
    pub const ALL: [SoundId; 71] = [
        SoundId::Kick,
        SoundId::Snare,
        SoundId::ClosedHat,
        SoundId::OpenHat,
        SoundId::Clap,
        SoundId::Rim,
        SoundId::Perc,
        SoundId::Shimmer,
        SoundId::HeavenlyChoir,
        SoundId::GospelChoir,
        SoundId::AngelVoice,
        SoundId::ChoirSwell,
        SoundId::Hallelujah,
        SoundId::DondaVocal,
        SoundId::SpiritualHum,
        SoundId::MonkChant,
        SoundId::Scream,
        SoundId::IndustrialHit,
        SoundId::GlitchBurst,
        SoundId::Siren,
        SoundId::Alarm,
        SoundId::Laser,
        SoundId::PowerUp,
        SoundId::DistortedBass,
        SoundId::SpaceAmbience,
        SoundId::Nebula,
        SoundId::Wormhole,
        SoundId::CosmicPad,
        SoundId::StarDust,
        SoundId::BlackHole,
        SoundId::Aurora,
        SoundId::TimeWarp,
        SoundId::BigImpact,
        SoundId::DropHit,
        SoundId::Crash,
        SoundId::Gunshot,
        SoundId::Explosion,
        SoundId::Punch,
        SoundId::Whoosh,
        SoundId::RiserImpact,
        SoundId::SynthStab,
        SoundId::FutureBass,
        SoundId::Pluck,
        SoundId::Arp,
        SoundId::Reese,
        SoundId::Lead,
        SoundId::Hoover,
        SoundId::ChipTune,
        SoundId::Riser,
        SoundId::Downlifter,
        SoundId::Atmosphere,
        SoundId::Sparkle,
        SoundId::GhostVoice,
        SoundId::WindChime,
        SoundId::Drone,
        SoundId::Reverse,
        SoundId::Sub808,
        SoundId::Slide808,
        SoundId::SoulSample,
        SoundId::VinylCrackle,
        SoundId::Chop,
        SoundId::Brass,
        SoundId::OrchHit,
        SoundId::PianoChop,
        SoundId::Rain,
        SoundId::Thunder,
        SoundId::Wind,
        SoundId::Birds,
        SoundId::Ocean,
        SoundId::Heartbeat,
        SoundId::Breath,
    ];

    pub fn category(self) -> Category {
        Category::ALL
            .into_iter()
            .find(|category| category.sounds().contains(&self))
            .unwrap_or(Category::Drums)
    }

    pub fn name(self) -> &'static str {
        match self {
            SoundId::Kick => "kick",
            SoundId::Snare => "snare",
            SoundId::ClosedHat => "closed_hat",
            SoundId::OpenHat => "open_hat",
            SoundId::Clap => "clap",
            SoundId::Rim => "rim",
            SoundId::Perc => "perc",
            SoundId::Shimmer => "shimmer",
            SoundId::HeavenlyChoir => "heavenly_choir",
            SoundId::GospelChoir => "gospel_choir",
            SoundId::AngelVoice => "angel_voice",
            SoundId::ChoirSwell => "choir_swell",
            SoundId::Hallelujah => "hallelujah",
            SoundId::DondaVocal => "donda_vocal",
            SoundId::SpiritualHum => "spiritual_hum",
            SoundId::MonkChant => "monk_chant",
            SoundId::Scream => "scream",
            SoundId::IndustrialHit => "industrial_hit",
            SoundId::GlitchBurst => "glitch_burst",
            SoundId::Siren => "siren",
            SoundId::Alarm => "alarm",
            SoundId::Laser => "laser",
            SoundId::PowerUp => "power_up",
            SoundId::DistortedBass => "distorted_bass",
            SoundId::SpaceAmbience => "space_ambience",
            SoundId::Nebula => "nebula",
            SoundId::Wormhole => "wormhole",
            SoundId::CosmicPad => "cosmic_pad",
            SoundId::StarDust => "star_dust",
            SoundId::BlackHole => "black_hole",
            SoundId::Aurora => "aurora",
            SoundId::TimeWarp => "time_warp",
            SoundId::BigImpact => "big_impact",
            SoundId::DropHit => "drop_hit",
            SoundId::Crash => "crash",
            SoundId::Gunshot => "gunshot",
            SoundId::Explosion => "explosion",
            SoundId::Punch => "punch",
            SoundId::Whoosh => "whoosh",
            SoundId::RiserImpact => "riser_impact",
            SoundId::SynthStab => "synth_stab",
            SoundId::FutureBass => "future_bass",
            SoundId::Pluck => "pluck",
            SoundId::Arp => "arp",
            SoundId::Reese => "reese",
            SoundId::Lead => "lead",
            SoundId::Hoover => "hoover",
            SoundId::ChipTune => "chip_tune",
            SoundId::Riser => "riser",
            SoundId::Downlifter => "downlifter",
            SoundId::Atmosphere => "atmosphere",
            SoundId::Sparkle => "sparkle",
            SoundId::GhostVoice => "ghost_voice",
            SoundId::WindChime => "wind_chime",
            SoundId::Drone => "drone",
            SoundId::Reverse => "reverse",
            SoundId::Sub808 => "808_sub",
            SoundId::Slide808 => "808_slide",
            SoundId::SoulSample => "soul_sample",
            SoundId::VinylCrackle => "vinyl_crackle",
            SoundId::Chop => "chop",
            SoundId::Brass => "brass",
            SoundId::OrchHit => "orch_hit",
            SoundId::PianoChop => "piano_chop",
            SoundId::Rain => "rain",
            SoundId::Thunder => "thunder",
            SoundId::Wind => "wind",
            SoundId::Birds => "birds",
            SoundId::Ocean => "ocean",
            SoundId::Heartbeat => "heartbeat",
            SoundId::Breath => "breath",
        }
    }

    /// Short pad caption.
    pub fn label(self) -> &'static str {
        match self {
            SoundId::Kick => "KICK",
            SoundId::Snare => "SNARE",
            SoundId::ClosedHat => "HAT",
            SoundId::OpenHat => "OPEN",
            SoundId::Clap => "CLAP",
            SoundId::Rim => "RIM",
            SoundId::Perc => "PERC",
            SoundId::Shimmer => "SHIMR",
            SoundId::HeavenlyChoir => "HEAVEN",
            SoundId::GospelChoir => "GOSPEL",
            SoundId::AngelVoice => "ANGEL",
            SoundId::ChoirSwell => "SWELL",
            SoundId::Hallelujah => "HALLELU",
            SoundId::DondaVocal => "DONDA",
            SoundId::SpiritualHum => "SPIRIT",
            SoundId::MonkChant => "MONK",
            SoundId::Scream => "SCREAM",
            SoundId::IndustrialHit => "INDUST",
            SoundId::GlitchBurst => "GLITCH",
            SoundId::Siren => "SIREN",
            SoundId::Alarm => "ALARM",
            SoundId::Laser => "LASER",
            SoundId::PowerUp => "POWER",
            SoundId::DistortedBass => "DIST",
            SoundId::SpaceAmbience => "SPACE",
            SoundId::Nebula => "NEBULA",
            SoundId::Wormhole => "WORM",
            SoundId::CosmicPad => "COSMIC",
            SoundId::StarDust => "STARS",
            SoundId::BlackHole => "BLACK",
            SoundId::Aurora => "AURORA",
            SoundId::TimeWarp => "TIME",
            SoundId::BigImpact => "BIG",
            SoundId::DropHit => "DROP",
            SoundId::Crash => "CRASH",
            SoundId::Gunshot => "SHOT",
            SoundId::Explosion => "BOOM",
            SoundId::Punch => "PUNCH",
            SoundId::Whoosh => "WHOOSH",
            SoundId::RiserImpact => "RISE+",
            SoundId::SynthStab => "STAB",
            SoundId::FutureBass => "FUTURE",
            SoundId::Pluck => "PLUCK",
            SoundId::Arp => "ARP",
            SoundId::Reese => "REESE",
            SoundId::Lead => "LEAD",
            SoundId::Hoover => "HOOVER",
            SoundId::ChipTune => "8BIT",
            SoundId::Riser => "RISER",
            SoundId::Downlifter => "DOWN",
            SoundId::Atmosphere => "ATMOS",
            SoundId::Sparkle => "SPARK",
            SoundId::GhostVoice => "GHOST",
            SoundId::WindChime => "CHIME",
            SoundId::Drone => "DRONE",
            SoundId::Reverse => "REVRS",
            SoundId::Sub808 => "SUB",
            SoundId::Slide808 => "SLIDE",
            SoundId::SoulSample => "SOUL",
            SoundId::VinylCrackle => "VINYL",
            SoundId::Chop => "CHOP",
            SoundId::Brass => "BRASS",
            SoundId::OrchHit => "ORCH",
            SoundId::PianoChop => "PIANO",
            SoundId::Rain => "RAIN",
            SoundId::Thunder => "THUNDR",
            SoundId::Wind => "WIND",
            SoundId::Birds => "BIRDS",
            SoundId::Ocean => "OCEAN",
            SoundId::Heartbeat => "HEART",
            SoundId::Breath => "BREATH",
        }
    }

    /// Resolve a name ignoring case, `-`, `_` and spaces.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        Self::ALL
            .into_iter()
            .find(|id| normalize(id.name()) == wanted)
    }

    /// Velocity used when the caller has no opinion.
    pub fn default_velocity(self) -> f32 {
        match self {
            SoundId::Kick | SoundId::Sub808 => 0.9,
            SoundId::BigImpact | SoundId::Explosion | SoundId::Slide808 => 0.8,
            SoundId::Snare
            | SoundId::IndustrialHit
            | SoundId::DistortedBass
            | SoundId::DropHit
            | SoundId::Gunshot
            | SoundId::RiserImpact
            | SoundId::OrchHit => 0.7,
            SoundId::Clap
            | SoundId::Scream
            | SoundId::Crash
            | SoundId::Punch
            | SoundId::SynthStab
            | SoundId::FutureBass
            | SoundId::Reese
            | SoundId::Hoover
            | SoundId::SoulSample
            | SoundId::Chop
            | SoundId::PianoChop
            | SoundId::Thunder => 0.6,
            SoundId::ClosedHat
            | SoundId::OpenHat
            | SoundId::Rim
            | SoundId::HeavenlyChoir
            | SoundId::GospelChoir
            | SoundId::ChoirSwell
            | SoundId::Hallelujah
            | SoundId::GlitchBurst
            | SoundId::Siren
            | SoundId::Alarm
            | SoundId::Laser
            | SoundId::PowerUp
            | SoundId::Whoosh
            | SoundId::Pluck
            | SoundId::Lead
            | SoundId::Riser
            | SoundId::Downlifter
            | SoundId::Reverse
            | SoundId::Brass
            | SoundId::Heartbeat => 0.5,
            SoundId::Perc
            | SoundId::AngelVoice
            | SoundId::DondaVocal
            | SoundId::MonkChant
            | SoundId::Wormhole
            | SoundId::BlackHole
            | SoundId::TimeWarp
            | SoundId::Arp
            | SoundId::ChipTune
            | SoundId::Atmosphere
            | SoundId::Sparkle
            | SoundId::GhostVoice
            | SoundId::WindChime => 0.4,
            SoundId::SpiritualHum | SoundId::Nebula | SoundId::CosmicPad => 0.35,
            SoundId::Wind => 0.25,
            SoundId::Shimmer
            | SoundId::SpaceAmbience
            | SoundId::StarDust
            | SoundId::Aurora
            | SoundId::Drone
            | SoundId::VinylCrackle
            | SoundId::Rain
            | SoundId::Birds
            | SoundId::Ocean
            | SoundId::Breath => 0.3,
        }
    }

    /// Minimum re-trigger interval in seconds, for hits that suffer from
    /// input bounce.
    pub fn debounce(self, kick_debounce_secs: f32) -> Option<f32> {
        match self {
            SoundId::Kick => Some(kick_debounce_secs),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sound_has_one_category() {
        let total: usize = Category::ALL.iter().map(|c| c.sounds().len()).sum();
        assert_eq!(total, SoundId::ALL.len());
        assert_eq!(SoundId::ChipTune.category(), Category::Synths);
        assert_eq!(SoundId::Breath.category(), Category::Ambient);
        assert_eq!(Category::Drums.sounds()[0], SoundId::Kick);
    }

    #[test]
    fn test_names_round_trip_and_are_unique() {
        for id in SoundId::ALL {
            assert_eq!(SoundId::from_name(id.name()), Some(id));
        }
        assert_eq!(SoundId::from_name("Heavenly Choir"), Some(SoundId::HeavenlyChoir));
        assert_eq!(SoundId::from_name("808-sub"), Some(SoundId::Sub808));
        assert_eq!(SoundId::from_name("kazoo"), None);
    }

    #[test]
    fn test_only_kick_is_debounced() {
        assert_eq!(SoundId::Kick.debounce(0.05), Some(0.05));
        assert!(SoundId::ALL
            .iter()
            .filter(|id| **id != SoundId::Kick)
            .all(|id| id.debounce(0.05).is_none()));
    }

    #[test]
    fn test_category_cycle_wraps() {
        assert_eq!(Category::Ambient.next(), Category::Drums);
        assert_eq!(Category::Drums.next(), Category::Choir);
    }
}
