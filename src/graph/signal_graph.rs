use crate::dsp::analyser::Analyser;
use crate::error::AudioEngineFault;
use crate::graph::chorus::ChorusNode;
use crate::graph::delay::DelayNode;
use crate::graph::distortion::DistortionNode;
use crate::graph::dynamics::DynamicsNode;
use crate::graph::filter::FilterNode;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::reverb::ReverbNode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Signal Graph
============

The chain is fixed once built. Generators never touch the effect units;
they write into one of the named buses and the graph sums each bus in
front of the stage it names.

  Filter bus ──> [filter] ─> [chorus] ─> [delay] ─┐
                                                  v
  Reverb bus ───────────────────────────────────>(+)─> [reverb] ─┐
                                                                 v
  Distortion bus ───────────────────────────────────────────────(+)─> [distortion] ─┐
                                                                                    v
  Compressor bus ──────────────────────────────────────────────────────────────────(+)
                                                                                    │
        ┌───────────────────────────────────────────────────────────────────────────┘
        v
  [compressor] ─> [limiter] ─> [analyser tap] ─> (+) ─> [master gain] ─> out
                                                  ^
  Master bus ─────────────────────────────────────┘

Master-bus sounds (chip tunes, vinyl crackle) skip every effect and the
analyser but still follow the master volume.
*/

/// Named insertion points for voices and one-shots.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    /// Melodic voices; swept by the filter knob.
    Filter,
    /// Ambient, choir and melodic one-shots wanting long tails.
    Reverb,
    /// Stabs that want saturation but no tail.
    Distortion,
    /// Percussion: heavy compression, no reverb.
    Compressor,
    /// Lo-fi material that bypasses the effects.
    Master,
}

impl Bus {
    pub const COUNT: usize = 5;

    pub const ALL: [Bus; Self::COUNT] = [
        Bus::Filter,
        Bus::Reverb,
        Bus::Distortion,
        Bus::Compressor,
        Bus::Master,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// One mono scratch buffer per bus, cleared at the start of every block.
pub struct BusBuffers {
    buffers: [Vec<f32>; Bus::COUNT],
    len: usize,
}

impl BusBuffers {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: std::array::from_fn(|_| vec![0.0; capacity]),
            len: 0,
        }
    }

    /// Zero every bus and set the active block length.
    pub fn clear(&mut self, len: usize) {
        for buffer in &mut self.buffers {
            if buffer.len() < len {
                buffer.resize(len, 0.0);
            }
            buffer[..len].fill(0.0);
        }
        self.len = len;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bus(&self, bus: Bus) -> &[f32] {
        &self.buffers[bus.index()][..self.len]
    }

    pub fn bus_mut(&mut self, bus: Bus) -> &mut [f32] {
        let len = self.len;
        &mut self.buffers[bus.index()][..len]
    }

    /// Sum `signal` into `bus`.
    pub fn add(&mut self, bus: Bus, signal: &[f32]) {
        for (dst, src) in self.bus_mut(bus).iter_mut().zip(signal) {
            *dst += src;
        }
    }
}

fn sum_into(out: &mut [f32], signal: &[f32]) {
    for (dst, src) in out.iter_mut().zip(signal) {
        *dst += src;
    }
}

/// Knob positions applied to the effect units, all in [0, 1] except `bpm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSettings {
    pub reverb: f32,
    pub delay: f32,
    pub filter: f32,
    pub shimmer: f32,
    pub warmth: f32,
    pub space: f32,
    pub master: f32,
    pub drive: f32,
    pub bpm: f32,
}

pub struct SignalGraph {
    filter: FilterNode,
    chorus: ChorusNode,
    delay: DelayNode,
    reverb: ReverbNode,
    distortion: DistortionNode,
    compressor: DynamicsNode,
    limiter: DynamicsNode,
    analyser: Analyser,
    master: f32,
}

impl SignalGraph {
    pub fn new(
        sample_rate: f32,
        fft_size: usize,
        smoothing: f32,
        settings: &EffectSettings,
    ) -> Result<Self, AudioEngineFault> {
        Ok(Self {
            filter: FilterNode::lowpass(settings.filter),
            chorus: ChorusNode::new(sample_rate, settings.shimmer),
            delay: DelayNode::new(sample_rate, settings.delay, settings.bpm),
            reverb: ReverbNode::new(
                sample_rate,
                settings.reverb,
                settings.space,
                settings.warmth,
            ),
            distortion: DistortionNode::new(settings.drive),
            compressor: DynamicsNode::compressor(sample_rate),
            limiter: DynamicsNode::limiter(sample_rate),
            analyser: Analyser::new(fft_size, smoothing)?,
            master: settings.master.clamp(0.0, 1.0),
        })
    }

    pub fn set_reverb(&mut self, value: f32) {
        self.reverb.set_amount(value);
    }

    pub fn set_space(&mut self, value: f32) {
        self.reverb.set_space(value);
    }

    pub fn set_warmth(&mut self, value: f32) {
        self.reverb.set_warmth(value);
    }

    pub fn set_delay(&mut self, value: f32) {
        self.delay.set_wet(value);
    }

    pub fn set_filter(&mut self, value: f32) {
        self.filter.set_value(value);
    }

    pub fn set_shimmer(&mut self, value: f32) {
        self.chorus.set_shimmer(value);
    }

    pub fn set_drive(&mut self, value: f32) {
        self.distortion.set_drive(value);
    }

    pub fn set_master(&mut self, value: f32) {
        self.master = value.clamp(0.0, 1.0);
    }

    pub fn set_tempo(&mut self, bpm: f32) {
        self.delay.set_tempo(bpm);
    }

    /// (primary, secondary) delay tap times in seconds.
    pub fn delay_times(&self) -> (f32, f32) {
        self.delay.tap_times()
    }

    pub fn filter_cutoff_hz(&self) -> f32 {
        self.filter.cutoff_hz()
    }

    pub fn reverb_levels(&self) -> (f32, f32) {
        self.reverb.levels()
    }

    pub fn delay_wet(&self) -> f32 {
        self.delay.wet()
    }

    pub fn chorus_wet(&self) -> f32 {
        self.chorus.wet()
    }

    pub fn drive_gain(&self) -> f32 {
        self.distortion.pre_gain()
    }

    pub fn master_gain(&self) -> f32 {
        self.master
    }

    /// Mean of the analyser bins, in [0, 1].
    pub fn level(&mut self) -> f32 {
        self.analyser.level()
    }

    /// Smoothed per-bin magnitudes in [0, 1].
    pub fn spectrum(&mut self) -> &[f32] {
        self.analyser.frequency_data()
    }

    pub fn bin_count(&self) -> usize {
        self.analyser.bin_count()
    }

    /// Run one block of the bus contents through the chain into `out`.
    pub fn render(&mut self, buses: &BusBuffers, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len().min(buses.len());
        let out = &mut out[..len];

        out.copy_from_slice(buses.bus(Bus::Filter));
        self.filter.render_block(out, ctx);
        self.chorus.render_block(out, ctx);
        self.delay.render_block(out, ctx);

        sum_into(out, buses.bus(Bus::Reverb));
        self.reverb.render_block(out, ctx);

        sum_into(out, buses.bus(Bus::Distortion));
        self.distortion.render_block(out, ctx);

        sum_into(out, buses.bus(Bus::Compressor));
        self.compressor.render_block(out, ctx);
        self.limiter.render_block(out, ctx);

        self.analyser.capture(out);

        sum_into(out, buses.bus(Bus::Master));
        for sample in out.iter_mut() {
            *sample *= self.master;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48_000.0;

    fn settings() -> EffectSettings {
        EffectSettings {
            reverb: 0.5,
            delay: 0.3,
            filter: 0.7,
            shimmer: 0.6,
            warmth: 0.45,
            space: 0.75,
            master: 0.75,
            drive: 0.2,
            bpm: 120.0,
        }
    }

    fn graph() -> SignalGraph {
        SignalGraph::new(SR, 256, 0.8, &settings()).unwrap()
    }

    #[test]
    fn test_silent_buses_render_silence() {
        let mut graph = graph();
        let mut buses = BusBuffers::new(256);
        buses.clear(256);
        let mut out = vec![1.0; 256];

        graph.render(&buses, &mut out, &RenderCtx::new(SR, 0.0));

        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_master_bus_skips_analyser() {
        let mut graph = graph();
        let mut buses = BusBuffers::new(256);
        let ctx = RenderCtx::new(SR, 0.0);
        let mut out = vec![0.0; 256];

        for _ in 0..8 {
            buses.clear(256);
            buses.bus_mut(Bus::Master).fill(0.5);
            graph.render(&buses, &mut out, &ctx);
        }

        assert!(out.iter().all(|&s| (s - 0.375).abs() < 1e-6));
        assert_eq!(graph.level(), 0.0);
    }

    #[test]
    fn test_compressor_bus_reaches_analyser() {
        let mut graph = graph();
        let mut buses = BusBuffers::new(256);
        let ctx = RenderCtx::new(SR, 0.0);
        let mut out = vec![0.0; 256];

        for block in 0..8 {
            buses.clear(256);
            for (i, s) in buses.bus_mut(Bus::Compressor).iter_mut().enumerate() {
                let n = (block * 256 + i) as f32;
                *s = (n * 0.2).sin() * 0.3;
            }
            graph.render(&buses, &mut out, &ctx);
        }

        assert!(graph.level() > 0.0);
        assert!(out.iter().any(|s| s.abs() > 1e-3));
    }

    #[test]
    fn test_set_tempo_retunes_delay() {
        let mut graph = graph();
        graph.set_tempo(120.0);
        let (primary, secondary) = graph.delay_times();
        assert!((primary - 0.375).abs() < 1e-6);
        assert!((secondary - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_setters_map_knobs_to_units() {
        let mut graph = graph();
        graph.set_filter(0.0);
        graph.set_reverb(1.0);
        graph.set_master(0.2);

        assert_eq!(graph.filter_cutoff_hz(), 200.0);
        assert_eq!(graph.reverb_levels(), (1.0, 0.5));
        assert_eq!(graph.master_gain(), 0.2);
        assert_eq!(graph.delay_wet(), 0.3);
        assert!((graph.chorus_wet() - 0.4).abs() < 1e-6);
        assert!((graph.drive_gain() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_spectrum_has_half_fft_bins() {
        let mut graph = graph();
        assert_eq!(graph.spectrum().len(), 128);
    }
}
