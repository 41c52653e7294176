pub mod dsp;
pub mod engine; // Engine context, parameters, scheduling
pub mod error;
pub mod graph; // Signal graph and effect units
pub mod sequencing; // Scales, step pattern, step clock
pub mod sounds; // One-shot sound library
pub mod synth; // Voices and allocation

pub use engine::{Engine, EngineCommand, EngineConfig, Lifecycle, Param, TriggerSource};
pub use error::AudioEngineFault;
pub use sounds::{Category, SoundId};
pub use synth::{VoiceHandle, VoiceState, VoiceType};

pub const MAX_BLOCK_SIZE: usize = 2048;
