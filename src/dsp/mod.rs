//! Low-level DSP primitives used by the effect units, voices and one-shots.
//!
//! Everything here allocates at construction only. The primitives stay
//! focused on signal math; routing, lifetimes and parameter mapping live in
//! `graph`, `synth` and `sounds`.

/// FFT tap for level and spectrum reads.
pub mod analyser;
/// Scheduled parameter curves (set, ramps, cancel-and-hold).
pub mod automation;
/// Circular delay buffer with fractional reads.
pub mod delay;
/// Waveshaping transfer curves.
pub mod distortion;
/// Soft-knee compressor, also used as the limiter.
pub mod dynamics;
/// State-variable filter with multiple responses.
pub mod filter;
/// Oscillator waveforms and noise.
pub mod oscillator;
/// Schroeder reverb.
pub mod reverb;

pub use automation::{AutomationEvent, AutomationParam};
