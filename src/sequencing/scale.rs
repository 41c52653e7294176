//! Scale modes: semitone tables that quantize a step index to a pitch.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Steps per scale table; pad and keyboard indices wrap modulo this.
pub const SCALE_STEPS: usize = 16;

/// MIDI note that step 0 of every scale sits on (C3).
pub const BASE_NOTE: u8 = 48;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScaleMode {
    /// Major pentatonic over two and a half octaves.
    #[default]
    Dream,
    /// Harmonic minor.
    Cosmic,
    /// Major.
    Rain,
    /// Minor pentatonic.
    Kanye,
    /// Mixolydian.
    Gospel,
    /// Locrian.
    Dark,
}

impl ScaleMode {
    pub const ALL: [ScaleMode; 6] = [
        ScaleMode::Dream,
        ScaleMode::Cosmic,
        ScaleMode::Rain,
        ScaleMode::Kanye,
        ScaleMode::Gospel,
        ScaleMode::Dark,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScaleMode::Dream => "dream",
            ScaleMode::Cosmic => "cosmic",
            ScaleMode::Rain => "rain",
            ScaleMode::Kanye => "kanye",
            ScaleMode::Gospel => "gospel",
            ScaleMode::Dark => "dark",
        }
    }

    /// Case-insensitive lookup. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(name))
    }

    pub fn semitones(self) -> &'static [u8; SCALE_STEPS] {
        match self {
            ScaleMode::Dream => &[0, 2, 4, 7, 9, 12, 14, 16, 19, 21, 24, 26, 28, 31, 33, 36],
            ScaleMode::Cosmic => &[0, 2, 3, 5, 7, 8, 11, 12, 14, 15, 17, 19, 20, 23, 24, 26],
            ScaleMode::Rain => &[0, 2, 4, 5, 7, 9, 11, 12, 14, 16, 17, 19, 21, 23, 24, 26],
            ScaleMode::Kanye => &[0, 3, 5, 7, 10, 12, 15, 17, 19, 22, 24, 27, 29, 31, 34, 36],
            ScaleMode::Gospel => &[0, 2, 4, 5, 7, 9, 10, 12, 14, 16, 17, 19, 21, 22, 24, 26],
            ScaleMode::Dark => &[0, 1, 3, 5, 6, 8, 10, 12, 13, 15, 17, 18, 20, 22, 24, 25],
        }
    }

    /// MIDI note for step `index`, wrapping past the table end.
    pub fn midi_note(self, index: usize) -> u8 {
        BASE_NOTE + self.semitones()[index % SCALE_STEPS]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_ascend() {
        for mode in ScaleMode::ALL {
            let table = mode.semitones();
            assert_eq!(table[0], 0);
            assert!(table.windows(2).all(|w| w[0] < w[1]), "{}", mode.name());
        }
    }

    #[test]
    fn test_midi_note_wraps() {
        assert_eq!(ScaleMode::Dream.midi_note(0), 48);
        assert_eq!(ScaleMode::Dream.midi_note(3), 55);
        assert_eq!(ScaleMode::Dream.midi_note(19), 55);
        assert_eq!(ScaleMode::Dark.midi_note(1), 49);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(ScaleMode::from_name("Kanye"), Some(ScaleMode::Kanye));
        assert_eq!(ScaleMode::from_name(" dark "), Some(ScaleMode::Dark));
        assert_eq!(ScaleMode::from_name("lydian"), None);
        assert_eq!(ScaleMode::default(), ScaleMode::Dream);
    }
}
