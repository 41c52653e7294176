//! Sixteenth-note step clock and the row-to-sound mapping.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sequencing::pattern::{ROWS, STEPS};
use crate::sounds::SoundId;

pub const MIN_BPM: f32 = 40.0;
pub const MAX_BPM: f32 = 200.0;
pub const DEFAULT_BPM: f32 = 120.0;

/// Clamp to the supported tempo range. NaN falls back to the default tempo.
pub fn clamp_bpm(bpm: f32) -> f32 {
    if bpm.is_nan() {
        DEFAULT_BPM
    } else {
        bpm.clamp(MIN_BPM, MAX_BPM)
    }
}

/// Seconds per sixteenth note.
pub fn step_duration(bpm: f32) -> f64 {
    60.0 / clamp_bpm(bpm) as f64 / 4.0
}

/// Walks the 16 steps of a bar in real time.
///
/// The first step fires one step duration after [`start`](Self::start),
/// then every step duration after that.
#[derive(Debug, Clone)]
pub struct StepClock {
    bpm: f32,
    step: usize,
    elapsed: f64,
    running: bool,
}

impl StepClock {
    pub fn new(bpm: f32) -> Self {
        Self {
            bpm: clamp_bpm(bpm),
            step: 0,
            elapsed: 0.0,
            running: false,
        }
    }

    pub fn bpm(&self) -> f32 {
        self.bpm
    }

    pub fn set_bpm(&mut self, bpm: f32) {
        self.bpm = clamp_bpm(bpm);
    }

    pub fn step_duration(&self) -> f64 {
        step_duration(self.bpm)
    }

    pub fn start(&mut self) {
        self.running = true;
        self.step = 0;
        self.elapsed = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Step the next tick will play.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Move time forward by `dt` seconds and return the steps that fell due.
    pub fn advance(&mut self, dt: f64) -> Vec<usize> {
        let mut due = Vec::new();
        if !self.running || !(dt > 0.0) {
            return due;
        }

        self.elapsed += dt;
        let period = self.step_duration();
        while self.elapsed >= period {
            self.elapsed -= period;
            due.push(self.step);
            self.step = (self.step + 1) % STEPS;
        }
        due
    }
}

/// Which sound each sequencer row plays, and how hard relative to the
/// step velocity.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RowMap {
    rows: [(SoundId, f32); ROWS],
}

impl Default for RowMap {
    fn default() -> Self {
        Self {
            rows: [
                (SoundId::Kick, 1.0),
                (SoundId::Snare, 0.8),
                (SoundId::ClosedHat, 0.6),
                (SoundId::OpenHat, 0.5),
                (SoundId::Clap, 0.7),
                (SoundId::Rim, 0.6),
                (SoundId::Perc, 0.5),
                (SoundId::Shimmer, 0.4),
            ],
        }
    }
}

impl RowMap {
    /// Sound and effective velocity for `row` at step velocity `velocity`.
    pub fn resolve(&self, row: usize, velocity: f32) -> Option<(SoundId, f32)> {
        self.rows
            .get(row)
            .map(|&(sound, scale)| (sound, velocity * scale))
    }

    /// Reassign a row. Out-of-range rows are ignored.
    pub fn assign(&mut self, row: usize, sound: SoundId, scale: f32) {
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = (sound, scale.clamp(0.0, 1.0));
        }
    }

    pub fn sound(&self, row: usize) -> Option<SoundId> {
        self.rows.get(row).map(|&(sound, _)| sound)
    }
}
