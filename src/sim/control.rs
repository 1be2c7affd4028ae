use crate::config::{EngineConfig, MAX_FRAME_RATE, MIN_FRAME_RATE};
use crate::synth::{Mode, Shade};

/// Everything the control surface can ask for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    SetShade(Shade),
    SetMode(Mode),
    SetActiveVoiceCount(usize),
    /// Move the flow field to the next noise seed.
    NewSeed,
    /// Full restart: new root, new particles, new effect constants.
    Start,
    Stop,
    Pause,
    Resume,
    SetFrameRate(f32),
}

/// Global simulation parameters, one copy owned by the installation.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    pub shade: Shade,
    pub mode: Mode,
    pub active_voices: usize,
    pub frame_rate: f32,
    pub noise_seed: u32,
    pub audio_running: bool,
    /// Particles and field hold still while set.
    pub frozen: bool,
}

impl ControlState {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            shade: config.shade,
            mode: config.mode,
            active_voices: config.initial_voices,
            frame_rate: clamp_frame_rate(config.flow.frame_rate),
            noise_seed: config.seed.map_or(0, |seed| seed as u32),
            audio_running: false,
            frozen: false,
        }
    }

    /// Clamped to the supported frame rates; returns the stored value.
    pub fn set_frame_rate(&mut self, fps: f32) -> f32 {
        self.frame_rate = clamp_frame_rate(fps);
        self.frame_rate
    }

    pub fn bump_seed(&mut self) -> u32 {
        self.noise_seed = self.noise_seed.wrapping_add(1);
        self.noise_seed
    }

    pub fn frame_seconds(&self) -> f64 {
        1.0 / self.frame_rate as f64
    }
}

fn clamp_frame_rate(fps: f32) -> f32 {
    if fps.is_finite() {
        fps.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE)
    } else {
        MIN_FRAME_RATE
    }
}
