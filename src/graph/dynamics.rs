use crate::dsp::dynamics::{Compressor, DynamicsSettings};
use crate::graph::node::{GraphNode, RenderCtx};

/// Bus compressor or safety limiter stage.
///
/// Both sit at the tail of the chain and share one implementation; only
/// the settings differ. See [`DynamicsSettings::BUS_COMPRESSOR`] and
/// [`DynamicsSettings::SAFETY_LIMITER`].
pub struct DynamicsNode {
    compressor: Compressor,
}

impl DynamicsNode {
    pub fn new(settings: DynamicsSettings, sample_rate: f32) -> Self {
        Self {
            compressor: Compressor::new(settings, sample_rate),
        }
    }

    pub fn compressor(sample_rate: f32) -> Self {
        Self::new(DynamicsSettings::BUS_COMPRESSOR, sample_rate)
    }

    pub fn limiter(sample_rate: f32) -> Self {
        Self::new(DynamicsSettings::SAFETY_LIMITER, sample_rate)
    }

    pub fn settings(&self) -> DynamicsSettings {
        self.compressor.settings()
    }

    /// Gain reduction currently applied, in dB.
    pub fn reduction_db(&self) -> f32 {
        self.compressor.reduction_db()
    }
}

impl GraphNode for DynamicsNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        self.compressor.render(out);
    }
}
