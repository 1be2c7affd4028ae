pub mod config;
pub mod dsp;
pub mod graph; // Stereo effect nodes and combinators
pub mod installation; // Control events, simulation and audio wired together
pub mod io; // Output backends and metering
pub mod sim; // Flow field and particle kinematics
pub mod synth; // Voices, voice pool and the render path

pub use config::EngineConfig;
pub use installation::Installation;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
