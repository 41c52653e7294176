/// Circular delay buffer with fractional reads.
///
/// Capacity is fixed at construction, so nothing allocates on the audio path.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity.max(2)],
            write_pos: 0,
        }
    }

    /// Capacity needed to hold `seconds` of audio at `sample_rate`.
    pub fn capacity_for(seconds: f32, sample_rate: f32) -> usize {
        (seconds * sample_rate).ceil() as usize + 2
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Read `delay_samples` behind the write head with linear interpolation.
    ///
    /// Call before [`DelayLine::write`] for the current sample.
    #[inline]
    pub fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = delay_samples.clamp(1.0, (len - 1) as f32);
        let whole = delay.floor() as usize;
        let frac = delay - whole as f32;

        let a = self.buffer[(self.write_pos + len - whole) % len];
        let b = self.buffer[(self.write_pos + len - whole - 1) % len];
        a + (b - a) * frac
    }

    #[inline]
    pub fn write(&mut self, sample: f32) {
        self.buffer[self.write_pos] = sample;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
    }

    /// Whole-sample read-then-write.
    #[inline]
    pub fn next_sample(&mut self, sample: f32, delay_samples: usize) -> f32 {
        let delayed = self.read_interpolated(delay_samples as f32);
        self.write(sample);
        delayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_returns_after_delay() {
        let mut line = DelayLine::new(16);
        let mut out = Vec::new();
        out.push(line.next_sample(1.0, 4));
        for _ in 0..6 {
            out.push(line.next_sample(0.0, 4));
        }

        assert_eq!(out[4], 1.0);
        assert!(out.iter().enumerate().all(|(i, &s)| i == 4 || s == 0.0));
    }

    #[test]
    fn test_fractional_read_interpolates() {
        let mut line = DelayLine::new(8);
        line.write(0.0);
        line.write(1.0);
        // one sample back is 1.0, two samples back is 0.0
        let half = line.read_interpolated(1.5);
        assert!((half - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_capacity_for_covers_duration() {
        let cap = DelayLine::capacity_for(1.0, 48_000.0);
        assert!(cap >= 48_000);
    }
}
