use crate::dsp::automation::AutomationParam;
use crate::dsp::oscillator::{cents_to_ratio, Oscillator};
use crate::graph::node::{GraphNode, RenderCtx};
use crate::synth::recipe::{Envelope, Partial, VoiceType};

/// Shortest release a caller may force.
pub const MIN_RELEASE_SECS: f32 = 0.005;
/// Level the fallback release pins to, so the ramp never starts from zero.
const PIN_FLOOR: f32 = 1e-4;

/*
Voice Lifecycle
===============

  trigger                                  release(now)          teardown
     │                                          │                    │
     v                                          v                    v
  Attacking ──> Decaying ──> Sustaining ──> Releasing ──────────> Terminated
  0 -> vel      vel -> sus    hold sus      held -> 0

The attack and decay ramps are scheduled on the gain curve at trigger time,
so the first three states are a pure function of the clock. Release cancels
whatever is pending and ramps to zero from the instantaneous value.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Attacking,
    Decaying,
    Sustaining,
    Releasing,
    Terminated,
}

struct VoiceOscillator {
    osc: Oscillator,
    frequency: f32,
    level: f32,
}

/// A sustained, releasable note: a set of oscillators behind one gain curve.
pub struct Voice {
    voice_type: VoiceType,
    oscillators: Vec<VoiceOscillator>,
    gain: AutomationParam,
    velocity: f32,
    envelope: Envelope,
    started_at: f64,
    release_end: Option<f64>,
    rendered_until: f64,
}

impl Voice {
    pub fn new(
        voice_type: VoiceType,
        frequency: f32,
        velocity: f32,
        envelope: Envelope,
        partials: &[Partial],
        now: f64,
    ) -> Self {
        let count = partials.len().max(1) as f32;
        let oscillators = partials
            .iter()
            .enumerate()
            .map(|(i, partial)| VoiceOscillator {
                osc: Oscillator::new(partial.waveform),
                frequency: frequency * partial.ratio * cents_to_ratio(partial.detune_cents),
                level: velocity / count * voice_type.weight(i),
            })
            .collect();

        let attack_end = now + envelope.attack as f64;
        let mut gain = AutomationParam::new(0.0);
        gain.set_value_at_time(0.0, now);
        gain.linear_ramp_to_value_at_time(velocity, attack_end);
        if envelope.decay > 0.0 {
            gain.linear_ramp_to_value_at_time(
                envelope.sustain * velocity,
                attack_end + envelope.decay as f64,
            );
        }

        Self {
            voice_type,
            oscillators,
            gain,
            velocity,
            envelope,
            started_at: now,
            release_end: None,
            rendered_until: now,
        }
    }

    pub fn voice_type(&self) -> VoiceType {
        self.voice_type
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    pub fn sustain_level(&self) -> f32 {
        self.envelope.sustain * self.velocity
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    /// The gain curve, for inspection.
    pub fn gain(&self) -> &AutomationParam {
        &self.gain
    }

    pub fn oscillator_count(&self) -> usize {
        self.oscillators.len()
    }

    pub fn release_end(&self) -> Option<f64> {
        self.release_end
    }

    pub fn is_releasing(&self) -> bool {
        self.release_end.is_some()
    }

    pub fn state_at(&self, time: f64) -> VoiceState {
        if let Some(end) = self.release_end {
            return if time >= end {
                VoiceState::Terminated
            } else {
                VoiceState::Releasing
            };
        }

        let attack_end = self.started_at + self.envelope.attack as f64;
        let decay_end = attack_end + self.envelope.decay as f64;
        if time < attack_end {
            VoiceState::Attacking
        } else if time < decay_end {
            VoiceState::Decaying
        } else {
            VoiceState::Sustaining
        }
    }

    /// Ramp to silence from the value at `now`.
    ///
    /// `seconds` of `None` (or a non-finite value) uses the voice's own
    /// release time. Without cancel-and-hold the gain is pinned to its
    /// current value before the ramp. Returns when the ramp reaches zero.
    pub fn release(&mut self, now: f64, seconds: Option<f32>, cancel_and_hold: bool) -> f64 {
        let seconds = match seconds {
            Some(forced) if forced.is_finite() => forced.max(MIN_RELEASE_SECS),
            _ => self.envelope.release.max(MIN_RELEASE_SECS),
        };

        if cancel_and_hold {
            self.gain.cancel_and_hold_at_time(now);
        } else {
            let current = self.gain.value_at(now);
            self.gain.cancel_scheduled_values(now);
            self.gain.set_value_at_time(current.max(PIN_FLOOR), now);
        }

        let end = now + seconds as f64;
        self.gain.linear_ramp_to_value_at_time(0.0, end);
        self.release_end = Some(end);
        end
    }
}

impl GraphNode for Voice {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        // Gain curve first, then scale it by the oscillator mix in place.
        self.gain.render(out, ctx.time, ctx.sample_rate);
        for sample in out.iter_mut() {
            let mut mix = 0.0;
            for voice_osc in &mut self.oscillators {
                mix += voice_osc.osc.next_sample(voice_osc.frequency, ctx.sample_rate)
                    * voice_osc.level;
            }
            *sample *= mix;
        }

        self.gain.prune(ctx.time);
        self.rendered_until = ctx.end_time(out.len());
    }

    fn is_active(&self) -> bool {
        self.state_at(self.rendered_until) != VoiceState::Terminated
    }
}
