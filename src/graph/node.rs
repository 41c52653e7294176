/// Context passed to graph nodes during rendering
///
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - time: Engine time of the first sample in the block, in seconds
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, time: f64) -> Self {
        Self { sample_rate, time }
    }

    /// Engine time of sample `index` within the block.
    #[inline]
    pub fn sample_time(&self, index: usize) -> f64 {
        self.time + index as f64 / self.sample_rate as f64
    }

    /// Engine time just past the last sample of a block of `len` samples.
    #[inline]
    pub fn end_time(&self, len: usize) -> f64 {
        self.sample_time(len)
    }
}

/// Core trait for block-processing nodes
///
/// Effect units process `out` in place. Sources (voices, one-shots)
/// overwrite it.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node is still producing sound
    ///
    /// Used to know when a voice or one-shot can be torn down.
    fn is_active(&self) -> bool {
        true
    }
}
