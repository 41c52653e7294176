use crate::dsp::delay::DelayLine;
use crate::dsp::filter::SVFilter;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Tempo-Synced Ping-Pong Delay
============================

  in ──┬───────────────────────────────────────────── dry ──> (+) ──> out
       │                                                       ^
       └─> (+) ─> [primary tap] ──┬──> [secondary tap] ──┐     │
            ^                     │                      │     │
            │                     └───────> (+) <────────┘     │
            │                                │                 │
            │                          [LP 2.5 kHz] ──── wet ──┘
            │                                │
            └──────── feedback 0.45 <────────┘

The primary tap sits at a dotted eighth (0.75 beat), the secondary at an
eighth (0.5 beat) behind the primary. Repeats lose their top end on every
pass through the low-pass, so the tail darkens as it fades.
*/

const FEEDBACK: f32 = 0.45;
const DAMPING_HZ: f32 = 2_500.0;
const MAX_DELAY_S: f32 = 2.0;
const PRIMARY_BEATS: f32 = 0.75;
const SECONDARY_BEATS: f32 = 0.5;

/// Primary and secondary tap times in seconds for `bpm`.
pub fn tap_times_for(bpm: f32) -> (f32, f32) {
    let beat = 60.0 / bpm;
    (beat * PRIMARY_BEATS, beat * SECONDARY_BEATS)
}

pub struct DelayNode {
    primary: DelayLine,
    secondary: DelayLine,
    damping: SVFilter,
    primary_s: f32,
    secondary_s: f32,
    wet: f32,
    dry: f32,
}

impl DelayNode {
    pub fn new(sample_rate: f32, wet: f32, bpm: f32) -> Self {
        let capacity = DelayLine::capacity_for(MAX_DELAY_S, sample_rate);
        let (primary_s, secondary_s) = tap_times_for(bpm);

        Self {
            primary: DelayLine::new(capacity),
            secondary: DelayLine::new(capacity),
            damping: SVFilter::lowpass(DAMPING_HZ),
            primary_s,
            secondary_s,
            wet: wet.clamp(0.0, 1.0),
            dry: 1.0,
        }
    }

    pub fn set_wet(&mut self, wet: f32) {
        self.wet = wet.clamp(0.0, 1.0);
    }

    pub fn set_tempo(&mut self, bpm: f32) {
        let (primary_s, secondary_s) = tap_times_for(bpm);
        self.primary_s = primary_s.min(MAX_DELAY_S);
        self.secondary_s = secondary_s.min(MAX_DELAY_S);
    }

    /// Current (primary, secondary) tap times in seconds.
    pub fn tap_times(&self) -> (f32, f32) {
        (self.primary_s, self.secondary_s)
    }

    pub fn wet(&self) -> f32 {
        self.wet
    }
}

impl GraphNode for DelayNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sr = ctx.sample_rate;
        let primary_samples = self.primary_s * sr;
        let secondary_samples = self.secondary_s * sr;

        for sample in out.iter_mut() {
            let first = self.primary.read_interpolated(primary_samples);
            let second = self.secondary.read_interpolated(secondary_samples);
            let repeats = self.damping.process_at(first + second, DAMPING_HZ, sr);

            self.primary.write(*sample + repeats * FEEDBACK);
            self.secondary.write(first);

            *sample = *sample * self.dry + repeats * self.wet;
        }
    }
}
