use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::graph::node::{GraphNode, RenderCtx};
use crate::synth::voice::{Voice, VoiceState};
use crate::MAX_BLOCK_SIZE;

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a triggered voice. Never reused within a process.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoiceHandle(u64);

impl VoiceHandle {
    fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// A release that was actually applied: the voice and when it falls silent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Released {
    pub handle: VoiceHandle,
    pub ends_at: f64,
}

/// Voices the allocator has room for before its storage grows.
pub const VOICE_CAPACITY: usize = 64;

/// Tracks sounding voices by handle.
///
/// A voice is *held* from trigger until its first release; only held voices
/// count as active and only they can be released by handle. A released
/// voice keeps rendering its tail until the teardown task removes it.
///
/// Handles are issued in increasing order, so `held` stays sorted by
/// handle without ever being re-sorted.
pub struct VoiceAllocator {
    held: Vec<(VoiceHandle, Voice)>,
    tails: Vec<(VoiceHandle, Voice)>,
    temp_buffer: Vec<f32>,
    cancel_and_hold: bool,
}

impl VoiceAllocator {
    pub fn new(cancel_and_hold: bool) -> Self {
        Self::with_capacity(VOICE_CAPACITY, cancel_and_hold)
    }

    pub fn with_capacity(voices: usize, cancel_and_hold: bool) -> Self {
        Self {
            held: Vec::with_capacity(voices),
            tails: Vec::with_capacity(voices),
            temp_buffer: vec![0.0; MAX_BLOCK_SIZE],
            cancel_and_hold,
        }
    }

    pub fn insert(&mut self, voice: Voice) -> VoiceHandle {
        let handle = VoiceHandle::next();
        debug!(
            handle = handle.id(),
            voice = voice.voice_type().name(),
            "voice started"
        );
        self.held.push((handle, voice));
        handle
    }

    /// Begin the release of a held voice. Unknown or already released
    /// handles are ignored.
    pub fn release(
        &mut self,
        handle: VoiceHandle,
        now: f64,
        seconds: Option<f32>,
    ) -> Option<Released> {
        let index = self.held.binary_search_by_key(&handle, |(h, _)| *h).ok()?;
        let (handle, mut voice) = self.held.remove(index);
        let ends_at = voice.release(now, seconds, self.cancel_and_hold);
        debug!(handle = handle.id(), ends_at, "voice released");
        self.tails.push((handle, voice));
        Some(Released { handle, ends_at })
    }

    /// Fast-release every voice, held or already in its tail, appending
    /// each release applied to `released`.
    ///
    /// Tails that would end sooner than the forced release are left alone.
    pub fn release_all(&mut self, now: f64, seconds: f32, released: &mut Vec<Released>) {
        let forced_end = now + seconds as f64;
        let cancel_and_hold = self.cancel_and_hold;

        for (handle, voice) in &mut self.tails {
            if voice.release_end().map_or(true, |end| end > forced_end) {
                let ends_at = voice.release(now, Some(seconds), cancel_and_hold);
                released.push(Released {
                    handle: *handle,
                    ends_at,
                });
            }
        }

        for (handle, mut voice) in self.held.drain(..) {
            let ends_at = voice.release(now, Some(seconds), cancel_and_hold);
            debug!(handle = handle.id(), ends_at, "voice released");
            released.push(Released { handle, ends_at });
            self.tails.push((handle, voice));
        }
    }

    /// Drop the tail of `handle` once it has fallen silent.
    pub fn teardown(&mut self, handle: VoiceHandle, now: f64) -> bool {
        let before = self.tails.len();
        self.tails.retain(|(h, voice)| {
            *h != handle || voice.release_end().map_or(true, |end| end > now)
        });
        let removed = self.tails.len() < before;
        if removed {
            trace!(handle = handle.id(), "voice torn down");
        }
        removed
    }

    pub fn state(&self, handle: VoiceHandle, now: f64) -> VoiceState {
        self.voice(handle)
            .map_or(VoiceState::Terminated, |voice| voice.state_at(now))
    }

    pub fn voice(&self, handle: VoiceHandle) -> Option<&Voice> {
        self.held
            .iter()
            .chain(self.tails.iter())
            .find(|(h, _)| *h == handle)
            .map(|(_, voice)| voice)
    }

    /// Held voices.
    pub fn active_count(&self) -> usize {
        self.held.len()
    }

    pub fn active_handles(&self) -> Vec<VoiceHandle> {
        self.held.iter().map(|(handle, _)| *handle).collect()
    }

    /// Held voices plus release tails still rendering.
    pub fn sounding_count(&self) -> usize {
        self.held.len() + self.tails.len()
    }

    /// Sum every voice into `out`.
    pub fn render(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len().min(self.temp_buffer.len());
        let voices = self.held.iter_mut().chain(self.tails.iter_mut());

        for (_, voice) in voices {
            let temp = &mut self.temp_buffer[..len];
            voice.render_block(temp, ctx);
            for (o, v) in out.iter_mut().zip(temp.iter()) {
                *o += v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::Waveform;
    use crate::synth::recipe::{Envelope, Partial, VoiceType};

    fn voice(now: f64) -> Voice {
        let partials = [Partial {
            waveform: Waveform::Sine,
            ratio: 1.0,
            detune_cents: 0.0,
        }];
        Voice::new(
            VoiceType::Pad,
            220.0,
            0.8,
            Envelope::new(0.01, 0.1, 0.5, 0.5),
            &partials,
            now,
        )
    }

    #[test]
    fn test_handles_are_unique() {
        let mut alloc = VoiceAllocator::new(true);
        let a = alloc.insert(voice(0.0));
        let b = alloc.insert(voice(0.0));
        assert_ne!(a, b);
        assert_eq!(alloc.active_count(), 2);
    }

    #[test]
    fn test_second_release_is_ignored() {
        let mut alloc = VoiceAllocator::new(true);
        let handle = alloc.insert(voice(0.0));

        let first = alloc.release(handle, 1.0, None);
        let events_after_first = alloc.voice(handle).map(|v| v.gain().events().len());
        let second = alloc.release(handle, 1.1, None);

        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(
            alloc.voice(handle).map(|v| v.gain().events().len()),
            events_after_first
        );
        assert_eq!(alloc.active_count(), 0);
    }

    #[test]
    fn test_release_all_shortens_long_tails() {
        let mut alloc = VoiceAllocator::new(true);
        let tail = alloc.insert(voice(0.0));
        alloc.release(tail, 0.5, Some(2.0));
        let held = alloc.insert(voice(0.5));

        let mut released = Vec::new();
        alloc.release_all(0.6, 0.02, &mut released);

        assert_eq!(released.len(), 2);
        assert!(released.iter().all(|r| (r.ends_at - 0.62).abs() < 1e-6));
        assert!(released.iter().any(|r| r.handle == held));
        assert_eq!(alloc.state(tail, 0.7), VoiceState::Terminated);
    }

    #[test]
    fn test_release_all_with_no_voices() {
        let mut alloc = VoiceAllocator::new(false);
        let mut released = Vec::new();
        alloc.release_all(0.0, 0.02, &mut released);
        assert!(released.is_empty());
        assert_eq!(alloc.sounding_count(), 0);
    }

    #[test]
    fn test_teardown_waits_for_release_end() {
        let mut alloc = VoiceAllocator::new(true);
        let handle = alloc.insert(voice(0.0));
        alloc.release(handle, 0.0, Some(0.5));

        assert!(!alloc.teardown(handle, 0.2));
        assert_eq!(alloc.sounding_count(), 1);
        assert!(alloc.teardown(handle, 0.62));
        assert_eq!(alloc.sounding_count(), 0);
        assert_eq!(alloc.state(handle, 0.7), VoiceState::Terminated);
    }

    #[test]
    fn test_storage_is_reserved_up_front() {
        let mut alloc = VoiceAllocator::with_capacity(4, true);
        let held = alloc.held.capacity();
        let tails = alloc.tails.capacity();

        let handles: Vec<VoiceHandle> = (0..4).map(|_| alloc.insert(voice(0.0))).collect();
        alloc.release(handles[1], 0.1, None);
        let mut released = Vec::with_capacity(4);
        alloc.release_all(0.2, 0.02, &mut released);

        assert_eq!(released.len(), 4);
        assert_eq!(alloc.held.capacity(), held);
        assert_eq!(alloc.tails.capacity(), tails);
    }

    #[test]
    fn test_release_finds_handle_among_many() {
        let mut alloc = VoiceAllocator::new(false);
        let handles: Vec<VoiceHandle> = (0..5).map(|_| alloc.insert(voice(0.0))).collect();

        assert!(alloc.release(handles[3], 0.5, None).is_some());
        assert!(alloc.release(handles[0], 0.5, None).is_some());

        let mut rest = alloc.active_handles();
        rest.sort();
        assert_eq!(rest, vec![handles[1], handles[2], handles[4]]);
        assert!(alloc.voice(handles[3]).is_some_and(|v| v.is_releasing()));
    }

    #[test]
    fn test_render_sums_voices() {
        let ctx = RenderCtx::new(48_000.0, 0.0);
        let mut alloc = VoiceAllocator::new(true);
        alloc.insert(voice(0.0));
        alloc.insert(voice(0.0));

        let mut out = vec![0.0; 512];
        alloc.render(&mut out, &ctx);

        assert!(out.iter().any(|s| s.abs() > 1e-4));
    }
}
