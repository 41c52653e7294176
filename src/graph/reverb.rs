use crate::dsp::reverb::SchroederReverb;
use crate::graph::node::{GraphNode, RenderCtx};

/*
Reverb Unit
===========

Ambient one-shots, choirs and pads enter here (the reverb bus) on top of
everything already flowing down the chain.

  out = in * dry + room(in) * wet        dry = 1 - wet * 0.5

Raising the wet level only halves the dry path at most, so perceived
loudness stays roughly constant while the space grows around the sound.

  space  -> room size (comb feedback)
  warmth -> damping  (how quickly the highs die in the tail)
*/

/// (wet, dry) gains for a reverb knob position.
pub fn reverb_levels(value: f32) -> (f32, f32) {
    let wet = value.clamp(0.0, 1.0);
    (wet, 1.0 - wet * 0.5)
}

pub struct ReverbNode {
    reverb: SchroederReverb,
    wet: f32,
    dry: f32,
}

impl ReverbNode {
    pub fn new(sample_rate: f32, amount: f32, space: f32, warmth: f32) -> Self {
        let mut reverb = SchroederReverb::new(sample_rate);
        reverb.set_room_size(space);
        reverb.set_damping(warmth);
        let (wet, dry) = reverb_levels(amount);

        Self { reverb, wet, dry }
    }

    pub fn set_amount(&mut self, amount: f32) {
        (self.wet, self.dry) = reverb_levels(amount);
    }

    pub fn set_space(&mut self, space: f32) {
        self.reverb.set_room_size(space);
    }

    pub fn set_warmth(&mut self, warmth: f32) {
        self.reverb.set_damping(warmth);
    }

    pub fn levels(&self) -> (f32, f32) {
        (self.wet, self.dry)
    }
}

impl GraphNode for ReverbNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            let wet = self.reverb.process(*sample);
            *sample = *sample * self.dry + wet * self.wet;
        }
    }
}
