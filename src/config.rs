//! Engine configuration.
//!
//! Every field has a default, so an empty (or missing) TOML file yields the
//! stock installation. Values are never rejected: [`EngineConfig::sanitized`]
//! clamps anything out of range.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::synth::{params::Mode, pitch::Shade};

pub const MAX_VOICES_LIMIT: usize = 1_000;
pub const MIN_FRAME_RATE: f32 = 1.0;
pub const MAX_FRAME_RATE: f32 = 120.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    /// Flow field cell edge in pixels.
    pub cell_size: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            cell_size: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Delay times are drawn uniformly from `[min_time, max_time]` seconds.
    pub min_time: f32,
    pub max_time: f32,
    pub feedback: f32,
    pub mix: f32,
    pub buffer_seconds: f32,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            min_time: 0.2,
            max_time: 0.8,
            feedback: 0.7,
            mix: 0.5,
            buffer_seconds: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChorusConfig {
    /// LFO rate in Hz.
    pub rate: f32,
    pub min_delay: f32,
    pub max_delay: f32,
    pub mix: f32,
    pub buffer_seconds: f32,
}

impl Default for ChorusConfig {
    fn default() -> Self {
        Self {
            rate: 0.2,
            min_delay: 0.01,
            max_delay: 0.05,
            mix: 0.5,
            buffer_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Simulation frames per second.
    pub frame_rate: f32,
    pub max_speed: f32,
    /// Noise-space step between neighbouring cells.
    pub noise_increment: f64,
    /// Noise-space z step per grid row, per frame.
    pub z_increment: f64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            max_speed: 4.0,
            noise_increment: 0.1,
            z_increment: 0.0003,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_voices: usize,
    pub initial_voices: usize,
    /// Ramp time for amplitude, pan and enable/disable changes.
    pub smoothing_ms: f32,
    pub shade: Shade,
    pub mode: Mode,
    /// Fixed seed for every random draw; `None` seeds from entropy.
    pub seed: Option<u64>,
    pub canvas: CanvasConfig,
    pub delay: DelayConfig,
    pub chorus: ChorusConfig,
    pub flow: FlowConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_voices: 100,
            initial_voices: 20,
            smoothing_ms: 20.0,
            shade: Shade::Red,
            mode: Mode::Particle,
            seed: None,
            canvas: CanvasConfig::default(),
            delay: DelayConfig::default(),
            chorus: ChorusConfig::default(),
            flow: FlowConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML file. The result is not yet sanitized.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Clamp every field into its usable range.
    pub fn sanitized(mut self) -> Self {
        self.max_voices = self.max_voices.clamp(1, MAX_VOICES_LIMIT);
        self.initial_voices = self.initial_voices.min(self.max_voices);
        self.smoothing_ms = finite_or(self.smoothing_ms, 20.0).clamp(1.0, 1_000.0);

        let canvas = &mut self.canvas;
        canvas.width = finite_or(canvas.width, 1280.0).max(1.0);
        canvas.height = finite_or(canvas.height, 720.0).max(1.0);
        canvas.cell_size =
            finite_or(canvas.cell_size, 20.0).clamp(1.0, canvas.width.min(canvas.height));

        let delay = &mut self.delay;
        delay.buffer_seconds = finite_or(delay.buffer_seconds, 2.0).clamp(0.01, 10.0);
        delay.min_time = finite_or(delay.min_time, 0.2).clamp(0.0, delay.buffer_seconds);
        delay.max_time = finite_or(delay.max_time, 0.8).clamp(delay.min_time, delay.buffer_seconds);
        delay.feedback = finite_or(delay.feedback, 0.7).clamp(0.0, 0.99);
        delay.mix = finite_or(delay.mix, 0.5).clamp(0.0, 1.0);

        let chorus = &mut self.chorus;
        chorus.buffer_seconds = finite_or(chorus.buffer_seconds, 1.0).clamp(0.01, 10.0);
        chorus.rate = finite_or(chorus.rate, 0.2).clamp(0.0, 20.0);
        chorus.min_delay = finite_or(chorus.min_delay, 0.01).clamp(0.0, chorus.buffer_seconds);
        chorus.max_delay =
            finite_or(chorus.max_delay, 0.05).clamp(chorus.min_delay, chorus.buffer_seconds);
        chorus.mix = finite_or(chorus.mix, 0.5).clamp(0.0, 1.0);

        let flow = &mut self.flow;
        flow.frame_rate = finite_or(flow.frame_rate, 30.0).clamp(MIN_FRAME_RATE, MAX_FRAME_RATE);
        flow.max_speed = finite_or(flow.max_speed, 4.0).max(0.0);
        if !flow.noise_increment.is_finite() {
            flow.noise_increment = 0.1;
        }
        if !flow.z_increment.is_finite() {
            flow.z_increment = 0.0003;
        }

        self
    }

    /// Smoothing ramp in seconds.
    pub fn smoothing_seconds(&self) -> f32 {
        self.smoothing_ms / 1_000.0
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            initial_voices = 50
            shade = "blue"
            mode = "flow"

            [delay]
            feedback = 0.4
            "#,
        )
        .unwrap();

        assert_eq!(config.initial_voices, 50);
        assert_eq!(config.shade, Shade::Blue);
        assert_eq!(config.mode, Mode::Flow);
        assert_eq!(config.delay.feedback, 0.4);
        assert_eq!(config.delay.mix, 0.5);
        assert_eq!(config.chorus, ChorusConfig::default());
    }

    #[test]
    fn sanitized_clamps_out_of_range_values() {
        let mut config = EngineConfig::default();
        config.max_voices = 0;
        config.initial_voices = 500;
        config.delay.feedback = 4.0;
        config.delay.min_time = 5.0;
        config.chorus.mix = -1.0;
        config.flow.frame_rate = 1_000.0;
        config.canvas.width = f32::NAN;

        let config = config.sanitized();
        assert_eq!(config.max_voices, 1);
        assert_eq!(config.initial_voices, 1);
        assert_eq!(config.delay.feedback, 0.99);
        assert_eq!(config.delay.min_time, config.delay.buffer_seconds);
        assert!(config.delay.max_time >= config.delay.min_time);
        assert_eq!(config.chorus.mix, 0.0);
        assert_eq!(config.flow.frame_rate, MAX_FRAME_RATE);
        assert_eq!(config.canvas.width, 1280.0);
    }

    #[test]
    fn defaults_survive_sanitizing() {
        assert_eq!(EngineConfig::default().sanitized(), EngineConfig::default());
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = EngineConfig::default();
        config.seed = Some(42);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = EngineConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
