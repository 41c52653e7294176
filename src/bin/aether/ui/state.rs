//! Meter data flowing from the audio callback to the UI
//!
//! Fixed-size and Copy so the audio thread can push it without allocating.

/// Spectrum bins carried per frame. Larger analysers are truncated.
pub const METER_BINS: usize = 128;

#[derive(Clone, Copy, Debug)]
pub struct MeterFrame {
    /// Mean analyser magnitude (0.0-1.0)
    pub level: f32,
    /// Analyser bins (0.0-1.0), lowest frequency first
    pub bins: [f32; METER_BINS],
    /// Held voices
    pub active_voices: u16,
    /// One-shots still rendering
    pub oneshots: u16,
    /// Engine time in seconds
    pub now: f64,
}

impl Default for MeterFrame {
    fn default() -> Self {
        Self {
            level: 0.0,
            bins: [0.0; METER_BINS],
            active_voices: 0,
            oneshots: 0,
            now: 0.0,
        }
    }
}
