// Sustained, releasable voices: recipes, envelopes, allocation.
// One-shots live in `sounds` and never pass through the allocator.

pub mod allocator;
pub mod keys;
pub mod recipe;
pub mod voice;

pub use allocator::{Released, VoiceAllocator, VoiceHandle};
pub use keys::HeldKeys;
pub use recipe::{Envelope, Partial, VoiceType};
pub use voice::{Voice, VoiceState};
