use thiserror::Error;

/// Environment or programmer errors surfaced once, at engine construction.
///
/// Races and out-of-range input are never reported through this type: they
/// are absorbed by the engine as no-ops or clamps.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AudioEngineFault {
    #[error("sample rate must be a positive finite number, got {0}")]
    InvalidSampleRate(f32),

    #[error("analyser size must be a power of two between 32 and 32768, got {0}")]
    InvalidAnalyserSize(usize),

    #[error("analyser smoothing must lie in [0, 1), got {0}")]
    InvalidSmoothing(f32),

    #[error("{name} must be a positive finite duration, got {value}")]
    InvalidTimeout { name: &'static str, value: f32 },
}
