use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SizedSample, Stream, StreamConfig, SupportedStreamConfig};
use tracing::{debug, error, info};

use crate::io::{AudioBackend, AudioError};
use crate::synth::renderer::PoolRenderer;
use crate::MAX_BLOCK_SIZE;

/// Output through the default cpal device.
///
/// The device and its configuration are resolved once, in [`new`](Self::new).
/// Each [`start`](AudioBackend::start) builds a fresh stream around the
/// renderer it is handed; [`stop`](AudioBackend::stop) drops it.
pub struct CpalBackend {
    device: Device,
    config: SupportedStreamConfig,
    stream: Option<Stream>,
}

impl CpalBackend {
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoOutputDevice)?;
        let config = device.default_output_config()?;

        info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            format = %config.sample_format(),
            "opened output device"
        );

        Ok(Self {
            device,
            config,
            stream: None,
        })
    }

    pub fn channels(&self) -> usize {
        self.config.channels() as usize
    }

    fn build_stream<T>(&self, renderer: PoolRenderer) -> Result<Stream, AudioError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let config: StreamConfig = self.config.clone().into();
        let channels = (config.channels as usize).max(1);
        let mut renderer = renderer;
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE * channels];

        let stream = self.device.build_output_stream(
            &config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for chunk in data.chunks_mut(scratch.len()) {
                    let block = &mut scratch[..chunk.len()];
                    renderer.render_interleaved(block, channels);
                    for (out, &sample) in chunk.iter_mut().zip(block.iter()) {
                        *out = T::from_sample(sample);
                    }
                }
            },
            |err| error!(%err, "output stream error"),
            None,
        )?;

        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn sample_rate(&self) -> f32 {
        self.config.sample_rate().0 as f32
    }

    fn start(&mut self, renderer: PoolRenderer) -> Result<(), AudioError> {
        if self.stream.is_some() {
            debug!("output already running");
            return Ok(());
        }

        let stream = match self.config.sample_format() {
            cpal::SampleFormat::F32 => self.build_stream::<f32>(renderer)?,
            cpal::SampleFormat::I16 => self.build_stream::<i16>(renderer)?,
            cpal::SampleFormat::U16 => self.build_stream::<u16>(renderer)?,
            other => return Err(AudioError::UnsupportedFormat(other)),
        };
        stream.play()?;
        self.stream = Some(stream);

        info!("output stream started");
        Ok(())
    }

    fn stop(&mut self) {
        // Dropping the stream joins the callback; the renderer goes with it.
        if self.stream.take().is_some() {
            info!("output stream stopped");
        }
    }

    fn is_running(&self) -> bool {
        self.stream.is_some()
    }
}
