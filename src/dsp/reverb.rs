//! Schroeder reverb.
//!
//! ```text
//! in ──┬──> comb 29.7ms ──┐
//!      ├──> comb 37.1ms ──┤
//!      ├──> comb 41.1ms ──┼──> (+)/4 ──> allpass 5.0ms ──> allpass 1.7ms ──> out
//!      └──> comb 43.7ms ──┘
//! ```
//!
//! Combs build the decaying tail (`y[n] = x[n] + fb * lp(y[n - d])`), with a
//! one-pole low-pass in the loop so highs die first. The allpasses smear the
//! comb echoes into a dense wash without colouring the spectrum.
//!
//! Buffers are sized from the sample rate at construction; nothing allocates
//! afterwards.

const COMB_DELAYS_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];
const ALLPASS_DELAYS_MS: [f32; 2] = [5.0, 1.7];

/// Comb feedback at room size 0 and 1.
const FEEDBACK_RANGE: (f32, f32) = (0.7, 0.97);

fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    ((ms * sample_rate / 1000.0) as usize).max(1)
}

pub struct CombFilter {
    buffer: Vec<f32>,
    pos: usize,
    feedback: f32,
    damp: f32,
    lowpass: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            pos: 0,
            feedback: 0.5,
            damp: 0.5,
            lowpass: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.98);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let out = self.buffer[self.pos];
        self.lowpass = out * (1.0 - self.damp) + self.lowpass * self.damp;
        self.buffer[self.pos] = input + self.lowpass * self.feedback;
        self.pos = (self.pos + 1) % self.buffer.len();
        out
    }
}

pub struct AllpassFilter {
    buffer: Vec<f32>,
    pos: usize,
    gain: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            pos: 0,
            gain: 0.5,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let out = delayed - self.gain * input;
        self.buffer[self.pos] = input + self.gain * out;
        self.pos = (self.pos + 1) % self.buffer.len();
        out
    }
}

pub struct SchroederReverb {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
}

impl SchroederReverb {
    pub fn new(sample_rate: f32) -> Self {
        let combs = COMB_DELAYS_MS.map(|ms| CombFilter::new(ms_to_samples(ms, sample_rate)));
        let allpasses =
            ALLPASS_DELAYS_MS.map(|ms| AllpassFilter::new(ms_to_samples(ms, sample_rate)));

        let mut reverb = Self { combs, allpasses };
        reverb.set_room_size(0.5);
        reverb
    }

    /// 0 = small room, 1 = long hall.
    pub fn set_room_size(&mut self, size: f32) {
        let (lo, hi) = FEEDBACK_RANGE;
        let feedback = lo + size.clamp(0.0, 1.0) * (hi - lo);
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
        }
    }

    /// 0 = bright, 1 = dark.
    pub fn set_damping(&mut self, damp: f32) {
        for comb in &mut self.combs {
            comb.set_damp(damp);
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut out = 0.0;
        for comb in &mut self.combs {
            out += comb.process(input);
        }
        out *= 0.25;

        for allpass in &mut self.allpasses {
            out = allpass.process(out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comb_echo_arrives_after_delay() {
        let mut comb = CombFilter::new(10);
        comb.set_feedback(0.5);
        comb.set_damp(0.0);

        assert_eq!(comb.process(1.0), 0.0);
        for _ in 0..9 {
            comb.process(0.0);
        }
        assert!(comb.process(0.0) > 0.9);
    }

    #[test]
    fn test_impulse_produces_tail() {
        let mut reverb = SchroederReverb::new(48_000.0);
        reverb.process(1.0);

        let tail = (0..5_000).any(|_| reverb.process(0.0).abs() > 0.001);
        assert!(tail, "expected a reverb tail after the impulse");
    }

    #[test]
    fn test_full_room_stays_stable() {
        let mut reverb = SchroederReverb::new(48_000.0);
        reverb.set_room_size(1.0);
        reverb.set_damping(0.0);

        for _ in 0..48_000 {
            let out = reverb.process(0.1);
            assert!(out.is_finite());
            assert!(out.abs() < 10.0, "unstable output {}", out);
        }
    }
}
