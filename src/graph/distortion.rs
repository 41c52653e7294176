use crate::dsp::distortion::ShaperCurve;
use crate::dsp::filter::SVFilter;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Warm Saturation Unit
====================

  in ──> [LP 8 kHz] ──> x drive ──> [warm curve] ──> [HP 60 Hz] ──> out

The pre-filter keeps fizz out of the shaper, the post-filter strips the DC
and sub rumble that asymmetric clipping leaves behind. The drive knob sets
the pre-gain:

  drive 0.0 -> 0.5x  (cleaner than unity)
  drive 0.2 -> 1.0x  (default, gentle colour)
  drive 1.0 -> 3.0x  (obvious grit)
*/

const PRE_LOWPASS_HZ: f32 = 8_000.0;
const POST_HIGHPASS_HZ: f32 = 60.0;

/// Pre-gain applied ahead of the curve for a drive knob position.
pub fn pre_gain_for(drive: f32) -> f32 {
    0.5 + drive.clamp(0.0, 1.0) * 2.5
}

pub struct DistortionNode {
    pre: SVFilter,
    post: SVFilter,
    curve: ShaperCurve,
    pre_gain: f32,
}

impl DistortionNode {
    pub fn new(drive: f32) -> Self {
        Self {
            pre: SVFilter::lowpass(PRE_LOWPASS_HZ),
            post: SVFilter::highpass(POST_HIGHPASS_HZ),
            curve: ShaperCurve::Warm,
            pre_gain: pre_gain_for(drive),
        }
    }

    pub fn set_drive(&mut self, drive: f32) {
        self.pre_gain = pre_gain_for(drive);
    }

    pub fn pre_gain(&self) -> f32 {
        self.pre_gain
    }
}

impl GraphNode for DistortionNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.pre.render(out, ctx.sample_rate);
        for sample in out.iter_mut() {
            *sample = self.curve.apply(*sample * self.pre_gain);
        }
        self.post.render(out, ctx.sample_rate);
    }
}
