use rtrb::Producer;
use std::sync::Arc;

use crate::graph::{EffectsChain, RenderCtx, StereoNode};
use crate::io::meter::MeterFrame;
use crate::synth::{params::SharedParams, voice::RenderVoice};
use crate::MAX_BLOCK_SIZE;

/// The render half of a voice pool: every voice summed onto one stereo bus,
/// through the shared effects chain.
///
/// Owned by whichever backend is driving output. Never locks, never
/// allocates after construction, and loops only over the fixed voice list and
/// the block.
pub struct PoolRenderer {
    shared: Arc<SharedParams>,
    voices: Vec<RenderVoice>,
    effects: EffectsChain,
    ctx: RenderCtx,
    left: Vec<f32>,
    right: Vec<f32>,
    meter: Option<Producer<MeterFrame>>,
}

impl PoolRenderer {
    pub fn new(
        shared: Arc<SharedParams>,
        effects: EffectsChain,
        sample_rate: f32,
        smoothing_seconds: f32,
    ) -> Self {
        let voices = shared
            .voices()
            .iter()
            .map(|params| RenderVoice::new(params, sample_rate, smoothing_seconds))
            .collect();

        Self {
            shared,
            voices,
            effects,
            ctx: RenderCtx::new(sample_rate),
            left: vec![0.0; MAX_BLOCK_SIZE],
            right: vec![0.0; MAX_BLOCK_SIZE],
            meter: None,
        }
    }

    /// Publish a [`MeterFrame`] per block into `tx`.
    pub fn with_meter(mut self, tx: Producer<MeterFrame>) -> Self {
        self.meter = Some(tx);
        self
    }

    pub fn sample_rate(&self) -> f32 {
        self.ctx.sample_rate
    }

    /// Render `frames` (≤ MAX_BLOCK_SIZE) into the internal bus.
    fn render_bus(&mut self, frames: usize) {
        debug_assert!(frames <= MAX_BLOCK_SIZE);
        let left = &mut self.left[..frames];
        let right = &mut self.right[..frames];
        left.fill(0.0);
        right.fill(0.0);

        let sample_rate = self.ctx.sample_rate;
        let mut running = 0;
        for (voice, params) in self.voices.iter_mut().zip(self.shared.voices()) {
            if voice.render_add(params, left, right, sample_rate) {
                running += 1;
            }
        }
        self.shared.publish_running(running);

        self.effects.first_mut().set_mix(self.shared.delay_mix());
        self.effects.second_mut().set_mix(self.shared.chorus_mix());
        self.effects.process_block(left, right, &self.ctx);

        if let Some(tx) = self.meter.as_mut() {
            // Dropped when the UI is behind.
            let _ = tx.push(MeterFrame::from_block(left, right, running));
        }
    }

    /// Render planar stereo. Both slices must have the same length.
    pub fn render(&mut self, out_left: &mut [f32], out_right: &mut [f32]) {
        debug_assert_eq!(out_left.len(), out_right.len());
        let total = out_left.len().min(out_right.len());
        let mut written = 0;

        while written < total {
            let frames = (total - written).min(MAX_BLOCK_SIZE);
            self.render_bus(frames);

            out_left[written..written + frames].copy_from_slice(&self.left[..frames]);
            out_right[written..written + frames].copy_from_slice(&self.right[..frames]);
            written += frames;
        }
    }

    /// Render into an interleaved device buffer with `channels` channels.
    ///
    /// Stereo goes to channels 0 and 1, extra channels are silent, and a mono
    /// device gets the average of left and right.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        if channels == 0 {
            return;
        }
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            self.render_bus(frames);

            let out_off = frames_written * channels;
            let out = &mut data[out_off..out_off + frames * channels];
            for (i, frame) in out.chunks_exact_mut(channels).enumerate() {
                let (l, r) = (self.left[i], self.right[i]);
                if channels == 1 {
                    frame[0] = 0.5 * (l + r);
                } else {
                    frame[0] = l;
                    frame[1] = r;
                    frame[2..].fill(0.0);
                }
            }

            frames_written += frames;
        }

        // Trailing partial frame, if the host ever hands one over.
        data[total_frames * channels..].fill(0.0);
    }
}
