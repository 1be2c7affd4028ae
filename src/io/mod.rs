//! Output backends and metering.
//!
//! A backend owns the [`PoolRenderer`] while it is running and drives it from
//! whatever clock it has: the sound card for [`CpalBackend`], explicit calls
//! for [`OfflineBackend`]. Stopping a backend drops the renderer, so once
//! `stop()` returns nothing renders any more.

pub mod device;
pub mod meter;
pub mod offline;

pub use device::CpalBackend;
pub use meter::{MeterFrame, MeterReader};
pub use offline::OfflineBackend;

use thiserror::Error;

use crate::synth::renderer::PoolRenderer;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no default output device available")]
    NoOutputDevice,

    #[error("failed to fetch default output config")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("unsupported output sample format {0}")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to build output stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Something that can drive a [`PoolRenderer`].
pub trait AudioBackend {
    fn sample_rate(&self) -> f32;

    /// Take ownership of `renderer` and start pulling audio from it.
    fn start(&mut self, renderer: PoolRenderer) -> Result<(), AudioError>;

    /// Stop output and drop the renderer. Does nothing when already stopped.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}
