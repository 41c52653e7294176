//! Due-time bookkeeping for the engine.
//!
//! Auto-releases and voice teardowns are queued as timed tasks and popped
//! at block boundaries, so the safety ceiling is driven by rendered time
//! and can be tested without wall-clock waits. Debounce windows live
//! alongside because they answer the same question: has enough engine
//! time passed?

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use tracing::trace;

use crate::sounds::SoundId;
use crate::synth::allocator::VoiceHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Release a voice nobody released in time.
    AutoRelease(VoiceHandle),
    /// Drop a voice whose release tail has finished.
    Teardown(VoiceHandle),
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: f64,
    seq: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Earlier first; ties keep scheduling order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .total_cmp(&other.due)
            .then(self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(tasks: usize) -> Self {
        Self {
            queue: BinaryHeap::with_capacity(tasks),
            seq: 0,
        }
    }

    pub fn schedule(&mut self, due: f64, task: Task) {
        let entry = Entry {
            due,
            seq: self.seq,
            task,
        };
        self.seq += 1;
        self.queue.push(Reverse(entry));
    }

    /// Pop the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: f64) -> Option<(f64, Task)> {
        let Reverse(next) = self.queue.peek()?;
        if next.due > now {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        trace!(due = entry.due, task = ?entry.task, "task dispatched");
        Some((entry.due, entry.task))
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<f64> {
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// f32 windows read back slightly long as f64.
const TIME_EPSILON: f64 = 1e-6;

/// Minimum re-trigger interval per sound.
#[derive(Debug, Default)]
pub struct Debouncer {
    last: HashMap<SoundId, f64>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self {
            last: HashMap::with_capacity(SoundId::ALL.len()),
        }
    }

    /// Record a trigger of `sound` at `now` unless it lands inside the
    /// previous trigger's window. Returns whether the trigger may proceed.
    pub fn admit(&mut self, sound: SoundId, now: f64, window: f32) -> bool {
        if let Some(&last) = self.last.get(&sound) {
            if now - last + TIME_EPSILON < window as f64 {
                return false;
            }
        }
        self.last.insert(sound, now);
        true
    }
}
