//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! so they can be embedded directly inside voices and effects. They stay
//! focused on the signal-processing math; the graph and synth layers add
//! routing and parameter plumbing on top.

/// Fractional delay line over a fixed circular buffer.
pub mod delay;
/// Two-segment attack/decay envelope with hard retrigger.
pub mod envelope;
/// Control-rate helpers: bipolar/unipolar conversion and range mapping.
pub mod lfo;
/// Constant-power crossfade and pan laws.
pub mod mix;
/// Phase-accumulating sine oscillator.
pub mod oscillator;
/// Click-free parameter ramps.
pub mod smoother;

pub use envelope::EnvelopeState;
