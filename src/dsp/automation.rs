//! Scheduled parameter automation.
//!
//! An [`AutomationParam`] is a timeline of value changes. Callers schedule
//! events ahead of time (set, linear ramp, exponential ramp) and the render
//! path reads the resulting curve sample by sample. Nothing is polled: once
//! an attack/decay pair is scheduled the value simply follows it.
//!
//! ```text
//!  value
//!    |        /\
//!    |       /  \______________            linear ramps to velocity and
//!    |      /                  \           to sustain, then a release ramp
//!    |     /                    \          issued later from "now"
//!    |____/                      \____
//!    +----+----+----+---------+---+------> time
//!       set  ramp  ramp     hold  ramp
//! ```
//!
//! A ramp always starts at the time and value of the event before it, so a
//! ramp issued later than the previous event interpolates across the gap.
//! `cancel_and_hold_at_time` is the tool that makes release click-free: it
//! truncates whatever ramp is in progress so the curve is continuous at the
//! cancel time and the next ramp starts from the instantaneous value.

/// Smallest magnitude an exponential ramp may start from or head towards.
const EXP_FLOOR: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutomationEvent {
    /// Jump to `value` at `time`.
    SetValue { time: f64, value: f32 },
    /// Straight line from the previous event to `value`, arriving at `time`.
    LinearRamp { time: f64, value: f32 },
    /// Exponential curve from the previous event to `value`, arriving at `time`.
    ExponentialRamp { time: f64, value: f32 },
}

impl AutomationEvent {
    pub fn time(&self) -> f64 {
        match *self {
            Self::SetValue { time, .. }
            | Self::LinearRamp { time, .. }
            | Self::ExponentialRamp { time, .. } => time,
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            Self::SetValue { value, .. }
            | Self::LinearRamp { value, .. }
            | Self::ExponentialRamp { value, .. } => value,
        }
    }

    fn retimed(&self, time: f64, value: f32) -> Self {
        match self {
            Self::SetValue { .. } => Self::SetValue { time, value },
            Self::LinearRamp { .. } => Self::LinearRamp { time, value },
            Self::ExponentialRamp { .. } => Self::ExponentialRamp { time, value },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutomationParam {
    initial: f32,
    events: Vec<AutomationEvent>,
}

impl AutomationParam {
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            events: Vec::with_capacity(8),
        }
    }

    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(AutomationEvent::SetValue { time, value });
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(AutomationEvent::LinearRamp { time, value });
    }

    pub fn exponential_ramp_to_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(AutomationEvent::ExponentialRamp { time, value });
    }

    /// Drop every event scheduled at or after `time`.
    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|event| event.time() < time);
    }

    /// Drop every event after `time` and hold the curve at the value it has
    /// at `time`. A ramp that straddles `time` is shortened to end there at
    /// its interpolated value, so the curve stays continuous.
    pub fn cancel_and_hold_at_time(&mut self, time: f64) {
        let held = self.value_at(time);
        let straddling = self
            .events
            .iter()
            .find(|event| event.time() > time)
            .filter(|event| !matches!(event, AutomationEvent::SetValue { .. }))
            .copied();

        self.events.retain(|event| event.time() < time);

        match straddling {
            Some(ramp) => self.events.push(ramp.retimed(time, held)),
            None => self.events.push(AutomationEvent::SetValue { time, value: held }),
        }
    }

    /// Value of the curve at `time`.
    pub fn value_at(&self, time: f64) -> f32 {
        let mut prev_time = 0.0;
        let mut prev_value = self.initial;

        for event in &self.events {
            if event.time() <= time {
                prev_time = event.time();
                prev_value = event.value();
                continue;
            }

            return match *event {
                AutomationEvent::SetValue { .. } => prev_value,
                AutomationEvent::LinearRamp { time: end, value } => {
                    let span = end - prev_time;
                    if span <= 0.0 {
                        return value;
                    }
                    let progress = ((time - prev_time) / span) as f32;
                    prev_value + (value - prev_value) * progress
                }
                AutomationEvent::ExponentialRamp { time: end, value } => {
                    exponential_point(prev_time, prev_value, end, value, time)
                }
            };
        }

        prev_value
    }

    /// Fill `out` with the curve sampled from `start` at `sample_rate`.
    pub fn render(&self, out: &mut [f32], start: f64, sample_rate: f32) {
        let step = 1.0 / sample_rate as f64;

        // Fast path for a settled curve.
        if self.is_settled(start) {
            out.fill(self.value_at(start));
            return;
        }

        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.value_at(start + i as f64 * step);
        }
    }

    /// True when no event lies beyond `time`.
    pub fn is_settled(&self, time: f64) -> bool {
        self.events.iter().all(|event| event.time() <= time)
    }

    // Keep events sorted; equal times keep their scheduling order.
    fn insert(&mut self, event: AutomationEvent) {
        let index = self
            .events
            .iter()
            .position(|existing| existing.time() > event.time())
            .unwrap_or(self.events.len());
        self.events.insert(index, event);
    }

    /// Forget history that can no longer influence values at or after `time`.
    pub fn prune(&mut self, time: f64) {
        let last_past = self.events.iter().rposition(|event| event.time() <= time);
        if let Some(index) = last_past {
            if index > 0 {
                self.events.drain(..index);
            }
        }
    }
}

fn exponential_point(t0: f64, v0: f32, t1: f64, v1: f32, time: f64) -> f32 {
    let span = t1 - t0;
    if span <= 0.0 {
        return v1;
    }

    // Exponential curves cannot cross or touch zero.
    let start = if v0.abs() < EXP_FLOOR {
        EXP_FLOOR.copysign(if v1 == 0.0 { 1.0 } else { v1 })
    } else {
        v0
    };
    let end = if v1.abs() < EXP_FLOOR {
        EXP_FLOOR.copysign(start)
    } else {
        v1
    };
    if start.signum() != end.signum() {
        return v0;
    }

    let progress = ((time - t0) / span) as f32;
    start * (end / start).powf(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_linear_ramp_interpolates_from_previous_event() {
        let mut param = AutomationParam::new(0.0);
        param.set_value_at_time(0.0, 1.0);
        param.linear_ramp_to_value_at_time(1.0, 2.0);

        assert!(close(param.value_at(0.5), 0.0));
        assert!(close(param.value_at(1.5), 0.5));
        assert!(close(param.value_at(3.0), 1.0));
    }

    #[test]
    fn test_exponential_ramp_decays_geometrically() {
        let mut param = AutomationParam::new(0.0);
        param.set_value_at_time(1.0, 0.0);
        param.exponential_ramp_to_value_at_time(0.01, 1.0);

        assert!(close(param.value_at(0.5), 0.1));
        assert!(close(param.value_at(1.0), 0.01));
    }

    #[test]
    fn test_cancel_and_hold_truncates_ramp() {
        let mut param = AutomationParam::new(0.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 1.0);
        param.linear_ramp_to_value_at_time(0.5, 2.0);

        param.cancel_and_hold_at_time(0.25);

        assert!(close(param.value_at(0.25), 0.25));
        assert!(close(param.value_at(5.0), 0.25));
        assert_eq!(param.events().len(), 2);
        assert!(matches!(
            param.events()[1],
            AutomationEvent::LinearRamp { time, .. } if (time - 0.25).abs() < 1e-9
        ));
    }

    #[test]
    fn test_cancel_scheduled_values_keeps_past() {
        let mut param = AutomationParam::new(0.0);
        param.set_value_at_time(0.3, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 1.0);

        param.cancel_scheduled_values(0.5);

        assert_eq!(param.events().len(), 1);
        assert!(close(param.value_at(0.75), 0.3));
    }

    #[test]
    fn test_prune_preserves_current_value() {
        let mut param = AutomationParam::new(0.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 1.0);
        param.linear_ramp_to_value_at_time(0.0, 2.0);

        let before = param.value_at(1.5);
        param.prune(1.2);

        assert_eq!(param.events().len(), 2);
        assert!(close(param.value_at(1.5), before));
    }

    #[test]
    fn test_render_matches_value_at() {
        let mut param = AutomationParam::new(0.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 0.01);

        let mut out = vec![0.0; 8];
        param.render(&mut out, 0.0, 800.0);

        for (i, v) in out.iter().enumerate() {
            assert!(close(*v, param.value_at(i as f64 / 800.0)));
        }
    }
}
