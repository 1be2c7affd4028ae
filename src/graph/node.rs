/// Context passed to graph nodes during rendering.
///
/// The effects in this crate are not pitched, so unlike a voice graph there is
/// no note or velocity here, only the information every node needs to turn
/// seconds into samples.
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self { sample_rate }
    }
}

/// Core trait for stereo processing nodes.
///
/// Nodes transform a left/right pair of buffers in-place. Both slices always
/// have the same length, at most [`MAX_BLOCK_SIZE`](crate::MAX_BLOCK_SIZE).
pub trait StereoNode: Send {
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx);

    /// Clear internal history (delay buffers, feedback state).
    ///
    /// Default implementation does nothing (stateless nodes).
    fn reset(&mut self) {
        // Default: do nothing
    }
}
