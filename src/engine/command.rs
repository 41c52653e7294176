#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::engine::params::Param;
use crate::engine::TriggerSource;
use crate::sequencing::scale::ScaleMode;
use crate::sounds::SoundId;
use crate::synth::allocator::VoiceHandle;
use crate::synth::recipe::VoiceType;

/// Control messages from a UI thread to the thread that owns the engine.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum EngineCommand {
    Resume,
    Suspend,
    Trigger { source: TriggerSource, velocity: f32 },
    Release { handle: VoiceHandle, seconds: Option<f32> },
    KeyDown { key: char, source: TriggerSource, velocity: f32 },
    KeyUp { key: char },
    Play { sound: SoundId, velocity: f32 },
    SequencerStep { row: usize, velocity: f32 },
    Panic,
    SetParameter { param: Param, value: f32 },
    SetVoiceType(VoiceType),
    SetScaleMode(ScaleMode),
    SetTempo(f32),
}

pub trait CommandReceiver {
    fn pop(&mut self) -> Option<EngineCommand>;
}

#[cfg(feature = "rtrb")]
impl CommandReceiver for Consumer<EngineCommand> {
    fn pop(&mut self) -> Option<EngineCommand> {
        Consumer::pop(self).ok()
    }
}

impl CommandReceiver for std::collections::VecDeque<EngineCommand> {
    fn pop(&mut self) -> Option<EngineCommand> {
        self.pop_front()
    }
}
