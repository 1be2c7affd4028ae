//! Stereo effect nodes and the combinator that chains them.
//!
//! Every voice is summed into one stereo bus, and the bus runs through a single
//! shared effects chain. Nodes here process a left/right pair of buffers in
//! place; `extensions` adds the fluent `.through()` helper so the chain reads
//! in signal order.

/// Stereo chorus: two LFO-swept short delays.
pub mod chorus;
/// Fluent helpers for chaining nodes.
pub mod extensions;
/// Core node trait and render context.
pub mod node;
/// Cross-feedback stereo delay.
pub mod pingpong;
/// Serial composition of two nodes.
pub mod through;

pub use chorus::StereoChorus;
pub use extensions::StereoNodeExt;
pub use node::{RenderCtx, StereoNode};
pub use pingpong::PingPongDelay;
pub use through::Through;

use rand::Rng;
use std::f32::consts::TAU;

use crate::config::EngineConfig;

/// The shared bus effects: ping-pong delay into stereo chorus.
pub type EffectsChain = Through<PingPongDelay, StereoChorus>;

/// The random constants of one effects chain.
///
/// Drawn once per installation run and reused whenever the chain is rebuilt,
/// so stopping and resuming the output does not change the sound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectsPreset {
    pub delay_left: f32,
    pub delay_right: f32,
    pub chorus_phase: f32,
}

impl EffectsPreset {
    pub fn random<R: Rng>(config: &EngineConfig, rng: &mut R) -> Self {
        let (min, max) = pingpong::ordered(config.delay.min_time, config.delay.max_time);
        let mut delay_time = || if max > min { rng.gen_range(min..=max) } else { min };
        let delay_left = delay_time();
        let delay_right = delay_time();

        Self {
            delay_left,
            delay_right,
            chorus_phase: rng.gen_range(0.0..TAU),
        }
    }

    /// Build the chain these constants describe.
    pub fn build(&self, config: &EngineConfig, sample_rate: f32) -> EffectsChain {
        let delay = &config.delay;
        let chorus = &config.chorus;

        PingPongDelay::new(
            sample_rate,
            delay.buffer_seconds,
            self.delay_left,
            self.delay_right,
            delay.feedback,
            delay.mix,
        )
        .through(StereoChorus::new(
            sample_rate,
            chorus.buffer_seconds,
            chorus.rate,
            chorus.min_delay,
            chorus.max_delay,
            self.chorus_phase,
            chorus.mix,
        ))
    }
}
