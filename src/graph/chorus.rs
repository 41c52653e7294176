use std::f32::consts::TAU;

use crate::dsp::delay::DelayLine;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Ensemble Chorus
===============

Four modulated taps read one shared delay line. Each tap sits a little
further back and wobbles at its own rate, so the wet signal sounds like a
small section playing slightly out of time and tune.

  tap | base delay | LFO rate | depth
  ----+------------+----------+-------
   0  |   20 ms    | 0.5 Hz   | 3 ms
   1  |   25 ms    | 0.8 Hz   | 3 ms
   2  |   30 ms    | 1.1 Hz   | 3 ms
   3  |   35 ms    | 1.4 Hz   | 3 ms

  out = dry * 0.7 + (tap0 + tap1 + tap2 + tap3) * wet

The wet level follows the shimmer control; 0.6 shimmer gives the classic
0.4 wet.
*/

pub const CHORUS_TAPS: usize = 4;
const DRY_LEVEL: f32 = 0.7;
const DEPTH_S: f32 = 0.003;
/// Longest tap plus full modulation depth, with margin.
const MAX_DELAY_S: f32 = 0.1;

/// Wet level for a shimmer knob position.
pub fn wet_for_shimmer(shimmer: f32) -> f32 {
    shimmer.clamp(0.0, 1.0) * (0.4 / 0.6)
}

struct ChorusTap {
    base_delay_s: f32,
    rate_hz: f32,
    phase: f32,
}

pub struct ChorusNode {
    delay_line: DelayLine,
    taps: [ChorusTap; CHORUS_TAPS],
    wet: f32,
}

impl ChorusNode {
    pub fn new(sample_rate: f32, shimmer: f32) -> Self {
        let taps = std::array::from_fn(|i| ChorusTap {
            base_delay_s: 0.02 + i as f32 * 0.005,
            rate_hz: 0.5 + i as f32 * 0.3,
            phase: 0.0,
        });

        Self {
            delay_line: DelayLine::new(DelayLine::capacity_for(MAX_DELAY_S, sample_rate)),
            taps,
            wet: wet_for_shimmer(shimmer),
        }
    }

    pub fn set_shimmer(&mut self, shimmer: f32) {
        self.wet = wet_for_shimmer(shimmer);
    }

    pub fn wet(&self) -> f32 {
        self.wet
    }
}

impl GraphNode for ChorusNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let sample_rate = ctx.sample_rate;

        for sample in out.iter_mut() {
            let mut wet_sum = 0.0;
            for tap in &mut self.taps {
                let delay_s = tap.base_delay_s + (TAU * tap.phase).sin() * DEPTH_S;
                wet_sum += self.delay_line.read_interpolated(delay_s * sample_rate);

                tap.phase += tap.rate_hz / sample_rate;
                tap.phase -= tap.phase.floor();
            }

            self.delay_line.write(*sample);
            *sample = *sample * DRY_LEVEL + wet_sum * self.wet;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderCtx {
        RenderCtx::new(48_000.0, 0.0)
    }

    #[test]
    fn test_default_shimmer_gives_classic_wet() {
        assert!((wet_for_shimmer(0.6) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_dry_path_is_immediate() {
        let mut node = ChorusNode::new(48_000.0, 0.6);
        let mut buffer = vec![0.0; 64];
        buffer[0] = 1.0;

        node.render_block(&mut buffer, &ctx());

        assert!((buffer[0] - DRY_LEVEL).abs() < 1e-6);
        // taps are at least 17 ms back
        assert!(buffer[1..].iter().all(|&s| s.abs() < 1e-6));
    }

    #[test]
    fn test_taps_arrive_after_base_delay() {
        let mut node = ChorusNode::new(48_000.0, 0.6);
        let mut buffer = vec![0.0; 4_800];
        buffer[0] = 1.0;

        node.render_block(&mut buffer, &ctx());

        let echo: f32 = buffer[800..2_000].iter().map(|s| s.abs()).sum();
        assert!(echo > 0.5, "expected tap energy, got {}", echo);
    }
}
