/*
Engine
======

The explicit engine context. One value owns everything that makes sound:

  Engine
    ├── ParameterSet      knobs and selectors, valid before initialize
    ├── HeldKeys          auto-repeat guard for keyboard and pads
    └── Core              built by initialize()
          ├── SignalGraph     fixed effect chain + analyser
          ├── BusBuffers      per-block inputs to the chain
          ├── VoiceAllocator  held voices and release tails
          ├── OneShots        fire-and-forget library sounds
          ├── Scheduler       auto-release / teardown tasks
          ├── Debouncer       kick re-trigger window
          └── StdRng          detune jitter, noise seeds

Lifecycle:

  Uninitialized ──initialize()──> Running <──resume()/suspend()──> Suspended

Every operation is synchronous and only schedules work: voices carry their
own gain automation, one-shots carry their own curves, and the scheduler
holds timed tasks. Nothing advances until audio is rendered, so engine time
is rendered frames / sample rate and is frozen while suspended.

Calls that need a running engine (trigger, play, key_down) are no-ops
otherwise. Calls that can only make things quieter (release, panic,
key_up) work whenever the engine has been initialized.
*/

pub mod command;
pub mod config;
pub mod params;
pub mod scheduler;

use rand::{rngs::StdRng, Rng, SeedableRng};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::dsp::oscillator::midi_to_freq;
use crate::error::AudioEngineFault;
use crate::graph::node::RenderCtx;
use crate::graph::signal_graph::{Bus, BusBuffers, SignalGraph};
use crate::sequencing::clock::RowMap;
use crate::sequencing::scale::ScaleMode;
use crate::sounds::{catalog, OneShot, ShotScratch, SoundId};
use crate::synth::allocator::{Released, VoiceAllocator, VoiceHandle, VOICE_CAPACITY};
use crate::synth::keys::HeldKeys;
use crate::synth::recipe::{Envelope, VoiceType};
use crate::synth::voice::{Voice, VoiceState};
use crate::MAX_BLOCK_SIZE;

pub use command::{CommandReceiver, EngineCommand};
pub use config::EngineConfig;
pub use params::{Param, ParameterSet};
pub use scheduler::{Debouncer, Scheduler, Task};

/// Block size used by [`Engine::advance`], matching a typical platform
/// render quantum.
pub const RENDER_QUANTUM: usize = 128;

/// One-shots in flight before the list has to grow.
const ONESHOT_CAPACITY: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Running,
    Suspended,
}

/// What a trigger plays.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    /// Scale step on the note pads, using the current voice and envelope.
    Pad(usize),
    /// Keyboard note: quick attack, held at velocity.
    Midi(u8),
    /// A library one-shot. Never yields a handle.
    Sound(SoundId),
}

struct Core {
    graph: SignalGraph,
    buses: BusBuffers,
    allocator: VoiceAllocator,
    oneshots: Vec<OneShot>,
    shot_scratch: ShotScratch,
    scheduler: Scheduler,
    debouncer: Debouncer,
    rng: StdRng,
    block: Vec<f32>,
    released: Vec<Released>,
    frames: u64,
    sample_rate: f32,
}

impl Core {
    fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    fn schedule_teardown(&mut self, released: Released, grace: f32) {
        self.scheduler.schedule(
            released.ends_at + grace as f64,
            Task::Teardown(released.handle),
        );
    }

    fn dispatch(&mut self, now: f64, config: &EngineConfig) {
        while let Some((_, task)) = self.scheduler.pop_due(now) {
            match task {
                Task::AutoRelease(handle) => {
                    if let Some(released) = self.allocator.release(handle, now, None) {
                        debug!(handle = handle.id(), "voice auto-released");
                        self.schedule_teardown(released, config.teardown_grace_secs);
                    }
                }
                Task::Teardown(handle) => {
                    self.allocator.teardown(handle, now);
                }
            }
        }
    }

    fn render(&mut self, out: &mut [f32], config: &EngineConfig) {
        let len = out.len();
        let now = self.now();
        self.dispatch(now, config);

        let ctx = RenderCtx::new(self.sample_rate, now);
        self.buses.clear(len);
        self.allocator.render(self.buses.bus_mut(Bus::Filter), &ctx);
        for shot in &mut self.oneshots {
            shot.render(&mut self.buses, &mut self.shot_scratch, &ctx);
        }

        let end = ctx.end_time(len);
        self.oneshots.retain(|shot| {
            let finished = shot.is_finished(end);
            if finished {
                trace!(sound = shot.id().name(), "one-shot finished");
            }
            !finished
        });

        self.graph.render(&self.buses, out, &ctx);
        self.frames += len as u64;
    }
}

pub struct Engine {
    config: EngineConfig,
    params: ParameterSet,
    row_map: RowMap,
    held: HeldKeys<char>,
    lifecycle: Lifecycle,
    core: Option<Core>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            params: ParameterSet::default(),
            row_map: RowMap::default(),
            held: HeldKeys::new(),
            lifecycle: Lifecycle::Uninitialized,
            core: None,
        }
    }

    /// Build the signal graph. Calling it again once built does nothing.
    ///
    /// A configuration fault is reported here, once; the engine then stays
    /// uninitialized and every other operation keeps being a no-op.
    pub fn initialize(&mut self) -> Result<(), AudioEngineFault> {
        if self.core.is_some() {
            return Ok(());
        }

        let config = &self.config;
        let graph = config.validate().and_then(|()| {
            SignalGraph::new(
                config.sample_rate,
                config.fft_size,
                config.smoothing,
                &self.params.effect_settings(),
            )
        });
        let graph = match graph {
            Ok(graph) => graph,
            Err(fault) => {
                warn!(%fault, "engine failed to initialize");
                return Err(fault);
            }
        };

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.core = Some(Core {
            graph,
            buses: BusBuffers::new(MAX_BLOCK_SIZE),
            allocator: VoiceAllocator::with_capacity(VOICE_CAPACITY, config.cancel_and_hold),
            oneshots: Vec::with_capacity(ONESHOT_CAPACITY),
            shot_scratch: ShotScratch::new(MAX_BLOCK_SIZE),
            // an auto-release and a teardown per voice
            scheduler: Scheduler::with_capacity(2 * VOICE_CAPACITY),
            debouncer: Debouncer::new(),
            rng,
            block: vec![0.0; MAX_BLOCK_SIZE],
            released: Vec::with_capacity(VOICE_CAPACITY),
            frames: 0,
            sample_rate: config.sample_rate,
        });
        self.lifecycle = Lifecycle::Running;
        info!(sample_rate = config.sample_rate, "engine initialized");
        Ok(())
    }

    pub fn resume(&mut self) {
        if self.lifecycle == Lifecycle::Suspended {
            self.lifecycle = Lifecycle::Running;
            info!(now = self.now(), "engine resumed");
        }
    }

    pub fn suspend(&mut self) {
        if self.lifecycle == Lifecycle::Running {
            self.lifecycle = Lifecycle::Suspended;
            info!(now = self.now(), "engine suspended");
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn row_map_mut(&mut self) -> &mut RowMap {
        &mut self.row_map
    }

    pub fn graph(&self) -> Option<&SignalGraph> {
        self.core.as_ref().map(|core| &core.graph)
    }

    /// Engine time in seconds.
    pub fn now(&self) -> f64 {
        self.core.as_ref().map_or(0.0, Core::now)
    }

    fn running_core(&mut self) -> Option<&mut Core> {
        match self.lifecycle {
            Lifecycle::Running => self.core.as_mut(),
            _ => None,
        }
    }

    /// Start a voice (pad or keyboard note) or play a library sound.
    pub fn trigger(&mut self, source: TriggerSource, velocity: f32) -> Option<VoiceHandle> {
        let velocity = params::clamp_unit(velocity);
        let (frequency, voice_type, envelope) = match source {
            TriggerSource::Sound(sound) => {
                self.play(sound, velocity);
                return None;
            }
            TriggerSource::Pad(index) => (
                midi_to_freq(self.params.scale_mode.midi_note(index) as f32),
                self.params.voice_type,
                self.params.envelope(),
            ),
            TriggerSource::Midi(note) => (
                midi_to_freq(note as f32),
                self.params.voice_type.for_keyboard(),
                Envelope::KEYBOARD,
            ),
        };

        let auto_release = self.config.auto_release_secs as f64;
        let core = self.running_core()?;
        let now = core.now();
        let partials = voice_type.partials(&mut core.rng);
        let voice = Voice::new(voice_type, frequency, velocity, envelope, &partials, now);
        let handle = core.allocator.insert(voice);
        core.scheduler
            .schedule(now + auto_release, Task::AutoRelease(handle));
        Some(handle)
    }

    /// Release a held voice. Unknown, released or torn-down handles are
    /// ignored. Without `seconds` the voice's own release time is used.
    pub fn release(&mut self, handle: VoiceHandle, seconds: Option<f32>) {
        let grace = self.config.teardown_grace_secs;
        if let Some(core) = self.core.as_mut() {
            let now = core.now();
            if let Some(released) = core.allocator.release(handle, now, seconds) {
                core.schedule_teardown(released, grace);
            }
        }
    }

    /// Fast-release every voice and forget held keys.
    pub fn panic(&mut self) {
        self.held.clear();
        let fast = self.config.panic_release_secs;
        let grace = self.config.teardown_grace_secs;
        if let Some(core) = self.core.as_mut() {
            let now = core.now();
            let mut released = std::mem::take(&mut core.released);
            core.allocator.release_all(now, fast, &mut released);
            debug!(voices = released.len(), "panic");
            for r in released.drain(..) {
                core.schedule_teardown(r, grace);
            }
            core.released = released;
        }
    }

    /// Play a library sound. False when not running or debounced.
    pub fn play(&mut self, sound: SoundId, velocity: f32) -> bool {
        let velocity = params::clamp_unit(velocity);
        let debounce = sound.debounce(self.config.kick_debounce_secs);
        let Some(core) = self.running_core() else {
            return false;
        };
        let now = core.now();

        if let Some(window) = debounce {
            if !core.debouncer.admit(sound, now, window) {
                trace!(sound = sound.name(), "debounced");
                return false;
            }
        }

        let recipe = catalog::recipe(sound, velocity, &mut core.rng);
        let seed = core.rng.gen();
        let shot = OneShot::new(sound, recipe, now, seed);
        debug!(sound = sound.name(), velocity, ends_at = shot.ends_at(), "one-shot");
        core.oneshots.push(shot);
        true
    }

    /// Play the sound mapped to a sequencer row.
    pub fn play_sequencer_step(&mut self, row: usize, velocity: f32) -> bool {
        match self.row_map.resolve(row, params::clamp_unit(velocity)) {
            Some((sound, velocity)) => self.play(sound, velocity),
            None => false,
        }
    }

    /// Press a key. Auto-repeats of a key already down are ignored.
    pub fn key_down(
        &mut self,
        key: char,
        source: TriggerSource,
        velocity: f32,
    ) -> Option<VoiceHandle> {
        if !self.is_running() || !self.held.press(key) {
            return None;
        }
        let handle = self.trigger(source, velocity)?;
        self.held.attach(&key, handle);
        Some(handle)
    }

    /// Let go of a key, releasing whatever voice it started.
    pub fn key_up(&mut self, key: char) {
        if let Some(handle) = self.held.lift(&key) {
            let seconds = self.config.key_release_secs;
            self.release(handle, Some(seconds));
        }
    }

    /// Store a knob value, clamped, and apply it to the graph if built.
    /// Envelope knobs take effect on the next voice.
    pub fn set_parameter(&mut self, param: Param, value: f32) -> f32 {
        let value = self.params.set(param, value);
        if let Some(core) = self.core.as_mut() {
            let graph = &mut core.graph;
            match param {
                Param::Reverb => graph.set_reverb(value),
                Param::Delay => graph.set_delay(value),
                Param::Filter => graph.set_filter(value),
                Param::Shimmer => graph.set_shimmer(value),
                Param::Warmth => graph.set_warmth(value),
                Param::Space => graph.set_space(value),
                Param::Master => graph.set_master(value),
                Param::Drive => graph.set_drive(value),
                Param::Attack | Param::Decay | Param::Sustain | Param::Release => {}
            }
        }
        value
    }

    /// Name-keyed variant of [`set_parameter`](Self::set_parameter).
    /// Unknown names are ignored.
    pub fn set_parameter_named(&mut self, name: &str, value: f32) -> Option<f32> {
        Param::from_name(name).map(|param| self.set_parameter(param, value))
    }

    pub fn set_voice_type(&mut self, voice_type: VoiceType) {
        self.params.voice_type = voice_type;
    }

    /// Unknown names select the default voice.
    pub fn set_voice_type_named(&mut self, name: &str) -> VoiceType {
        let voice_type = VoiceType::from_name(name).unwrap_or_default();
        self.set_voice_type(voice_type);
        voice_type
    }

    pub fn set_scale_mode(&mut self, mode: ScaleMode) {
        self.params.scale_mode = mode;
    }

    /// Unknown names select the default mode.
    pub fn set_scale_mode_named(&mut self, name: &str) -> ScaleMode {
        let mode = ScaleMode::from_name(name).unwrap_or_default();
        self.set_scale_mode(mode);
        mode
    }

    /// Store the tempo, clamped to the supported range, and retune the delay.
    pub fn set_tempo(&mut self, bpm: f32) -> f32 {
        let bpm = self.params.set_bpm(bpm);
        if let Some(core) = self.core.as_mut() {
            core.graph.set_tempo(bpm);
        }
        bpm
    }

    /// Mean analyser magnitude in [0, 1]; 0 before initialization.
    pub fn level(&mut self) -> f32 {
        self.core.as_mut().map_or(0.0, |core| core.graph.level())
    }

    /// Analyser bins in [0, 1]; empty before initialization.
    pub fn spectrum(&mut self) -> &[f32] {
        match self.core.as_mut() {
            Some(core) => core.graph.spectrum(),
            None => &[],
        }
    }

    pub fn voice_state(&self, handle: VoiceHandle) -> VoiceState {
        self.core.as_ref().map_or(VoiceState::Terminated, |core| {
            core.allocator.state(handle, core.now())
        })
    }

    pub fn voice(&self, handle: VoiceHandle) -> Option<&Voice> {
        self.core
            .as_ref()
            .and_then(|core| core.allocator.voice(handle))
    }

    /// Voices triggered and not yet released.
    pub fn active_count(&self) -> usize {
        self.core
            .as_ref()
            .map_or(0, |core| core.allocator.active_count())
    }

    pub fn active_handles(&self) -> Vec<VoiceHandle> {
        self.core
            .as_ref()
            .map_or_else(Vec::new, |core| core.allocator.active_handles())
    }

    /// Held voices plus release tails still rendering.
    pub fn sounding_count(&self) -> usize {
        self.core
            .as_ref()
            .map_or(0, |core| core.allocator.sounding_count())
    }

    pub fn oneshot_count(&self) -> usize {
        self.core.as_ref().map_or(0, |core| core.oneshots.len())
    }

    pub fn pending_tasks(&self) -> usize {
        self.core.as_ref().map_or(0, |core| core.scheduler.len())
    }

    /// Render `out`. Silence, with time frozen, unless running.
    pub fn process_block(&mut self, out: &mut [f32]) {
        let config = &self.config;
        let core = match (self.lifecycle, self.core.as_mut()) {
            (Lifecycle::Running, Some(core)) => core,
            _ => {
                out.fill(0.0);
                return;
            }
        };
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            core.render(chunk, config);
        }
    }

    /// Render and discard `seconds` of audio in render-quantum blocks.
    pub fn advance(&mut self, seconds: f64) {
        let config = &self.config;
        let core = match (self.lifecycle, self.core.as_mut()) {
            (Lifecycle::Running, Some(core)) => core,
            _ => return,
        };
        let mut remaining = (seconds.max(0.0) * config.sample_rate as f64).round() as usize;
        let mut block = std::mem::take(&mut core.block);
        while remaining > 0 {
            let len = remaining.min(RENDER_QUANTUM);
            core.render(&mut block[..len], config);
            remaining -= len;
        }
        core.block = block;
    }

    pub fn apply(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Resume => self.resume(),
            EngineCommand::Suspend => self.suspend(),
            EngineCommand::Trigger { source, velocity } => {
                self.trigger(source, velocity);
            }
            EngineCommand::Release { handle, seconds } => self.release(handle, seconds),
            EngineCommand::KeyDown {
                key,
                source,
                velocity,
            } => {
                self.key_down(key, source, velocity);
            }
            EngineCommand::KeyUp { key } => self.key_up(key),
            EngineCommand::Play { sound, velocity } => {
                self.play(sound, velocity);
            }
            EngineCommand::SequencerStep { row, velocity } => {
                self.play_sequencer_step(row, velocity);
            }
            EngineCommand::Panic => self.panic(),
            EngineCommand::SetParameter { param, value } => {
                self.set_parameter(param, value);
            }
            EngineCommand::SetVoiceType(voice_type) => self.set_voice_type(voice_type),
            EngineCommand::SetScaleMode(mode) => self.set_scale_mode(mode),
            EngineCommand::SetTempo(bpm) => {
                self.set_tempo(bpm);
            }
        }
    }

    /// Apply every queued command.
    pub fn drain<R: CommandReceiver>(&mut self, rx: &mut R) {
        while let Some(command) = rx.pop() {
            self.apply(command);
        }
    }
}
