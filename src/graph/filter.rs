use crate::dsp::filter::SVFilter;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Master Filter
=============

First stage of the effect chain. Every melodic voice enters here, so the
filter knob sweeps the whole instrument from muffled to open.

  knob 0.0 ->   200 Hz
  knob 0.5 ->  9200 Hz
  knob 1.0 -> 18200 Hz

The resonance is fixed at Q 1.5: a slight bump at the cutoff that makes
sweeps audible without whistling.
*/

pub const FILTER_Q: f32 = 1.5;
const CUTOFF_MIN_HZ: f32 = 200.0;
const CUTOFF_SPAN_HZ: f32 = 18_000.0;

/// Map a normalized knob position to a cutoff in Hz.
pub fn cutoff_for(value: f32) -> f32 {
    CUTOFF_MIN_HZ + value.clamp(0.0, 1.0) * CUTOFF_SPAN_HZ
}

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn lowpass(value: f32) -> Self {
        let mut filter = SVFilter::lowpass(cutoff_for(value));
        filter.set_q(FILTER_Q);
        Self { filter }
    }

    pub fn set_value(&mut self, value: f32) {
        self.filter.set_cutoff(cutoff_for(value));
    }

    pub fn cutoff_hz(&self) -> f32 {
        self.filter.cutoff_hz
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx.sample_rate);
    }
}
