use crate::io::{AudioBackend, AudioError};
use crate::synth::renderer::PoolRenderer;

/// A backend without a device: audio is rendered only when asked for.
///
/// Used by tests, benchmarks and bounded headless runs. While stopped every
/// render call writes silence and reports `false`.
pub struct OfflineBackend {
    sample_rate: f32,
    renderer: Option<PoolRenderer>,
    frames_rendered: u64,
}

impl OfflineBackend {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            renderer: None,
            frames_rendered: 0,
        }
    }

    /// Render planar stereo. Returns whether a renderer was attached.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) -> bool {
        match self.renderer.as_mut() {
            Some(renderer) => {
                renderer.render(left, right);
                self.frames_rendered += left.len() as u64;
                true
            }
            None => {
                left.fill(0.0);
                right.fill(0.0);
                false
            }
        }
    }

    /// Render interleaved frames with `channels` channels.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) -> bool {
        match self.renderer.as_mut() {
            Some(renderer) => {
                renderer.render_interleaved(data, channels);
                self.frames_rendered += (data.len() / channels.max(1)) as u64;
                true
            }
            None => {
                data.fill(0.0);
                false
            }
        }
    }

    /// Frames rendered since construction, across restarts.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl AudioBackend for OfflineBackend {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn start(&mut self, renderer: PoolRenderer) -> Result<(), AudioError> {
        if self.renderer.is_none() {
            self.renderer = Some(renderer);
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.renderer = None;
    }

    fn is_running(&self) -> bool {
        self.renderer.is_some()
    }
}
