//! Lock-free parameter slots shared between the control path and the render
//! path.
//!
//! Every slot has exactly one writer. Plain values are latest-wins and use
//! relaxed ordering: a reader may see an update one block late, never a torn
//! value. Envelope retriggers are counted instead of flagged so that two
//! crossings between blocks cannot collapse into a lost edge.

use atomic_float::AtomicF32;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, AtomicUsize, Ordering};

/// Global interaction mode, chosen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Edge crossings fire the envelope.
    #[default]
    Particle,
    /// A free-running LFO pulses each voice.
    Flow,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Particle => "particle",
            Mode::Flow => "flow",
        }
    }
}

/// What drives a voice's gain stage. Exactly one source at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AmpSource {
    Envelope = 0,
    Lfo = 1,
}

impl AmpSource {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => AmpSource::Lfo,
            _ => AmpSource::Envelope,
        }
    }
}

impl From<Mode> for AmpSource {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Particle => AmpSource::Envelope,
            Mode::Flow => AmpSource::Lfo,
        }
    }
}

/// Parameter slots for a single voice.
#[derive(Debug)]
pub struct VoiceParams {
    // Written by the control path
    frequency: AtomicF32,
    osc_amplitude: AtomicF32,
    amplitude: AtomicF32,
    pan: AtomicF32,
    source: AtomicU8,
    enabled: AtomicBool,
    lfo_frequency: AtomicF32,
    lfo_phase: AtomicF32,
    trigger_seq: AtomicU32,

    // Written by the render path
    consumed_seq: AtomicU32,
    envelope_active: AtomicBool,
    peak: AtomicF32,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            frequency: AtomicF32::new(0.0),
            osc_amplitude: AtomicF32::new(1.0),
            amplitude: AtomicF32::new(0.0),
            pan: AtomicF32::new(0.0),
            source: AtomicU8::new(AmpSource::Envelope as u8),
            enabled: AtomicBool::new(false),
            lfo_frequency: AtomicF32::new(1.0),
            lfo_phase: AtomicF32::new(0.0),
            trigger_seq: AtomicU32::new(0),
            consumed_seq: AtomicU32::new(0),
            envelope_active: AtomicBool::new(false),
            peak: AtomicF32::new(0.0),
        }
    }
}

impl VoiceParams {
    pub fn set_oscillator(&self, frequency: f32, amplitude: f32) {
        self.frequency.store(frequency, Ordering::Relaxed);
        self.osc_amplitude.store(amplitude, Ordering::Relaxed);
    }

    pub fn frequency(&self) -> f32 {
        self.frequency.load(Ordering::Relaxed)
    }

    pub fn osc_amplitude(&self) -> f32 {
        self.osc_amplitude.load(Ordering::Relaxed)
    }

    pub fn set_amplitude(&self, amplitude: f32) {
        self.amplitude.store(amplitude, Ordering::Relaxed);
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude.load(Ordering::Relaxed)
    }

    pub fn set_pan(&self, pan: f32) {
        self.pan.store(pan, Ordering::Relaxed);
    }

    pub fn pan(&self) -> f32 {
        self.pan.load(Ordering::Relaxed)
    }

    pub fn set_source(&self, source: AmpSource) {
        self.source.store(source as u8, Ordering::Relaxed);
    }

    pub fn source(&self) -> AmpSource {
        AmpSource::from_u8(self.source.load(Ordering::Relaxed))
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// LFO constants, read once when a render voice is built.
    pub fn set_lfo(&self, frequency: f32, phase: f32) {
        self.lfo_frequency.store(frequency, Ordering::Relaxed);
        self.lfo_phase.store(phase, Ordering::Relaxed);
    }

    pub fn lfo(&self) -> (f32, f32) {
        (
            self.lfo_frequency.load(Ordering::Relaxed),
            self.lfo_phase.load(Ordering::Relaxed),
        )
    }

    /// Request an envelope restart.
    pub fn request_trigger(&self) {
        self.trigger_seq.fetch_add(1, Ordering::Release);
    }

    pub fn trigger_seq(&self) -> u32 {
        self.trigger_seq.load(Ordering::Acquire)
    }

    /// Render side: record the envelope state after handling `seq`.
    pub fn publish_envelope(&self, seq: u32, active: bool) {
        self.envelope_active.store(active, Ordering::Relaxed);
        self.consumed_seq.store(seq, Ordering::Release);
    }

    pub fn consumed_seq(&self) -> u32 {
        self.consumed_seq.load(Ordering::Acquire)
    }

    /// True once a trigger has been requested, until its curve has played out.
    pub fn envelope_active(&self) -> bool {
        let consumed = self.consumed_seq();
        self.trigger_seq() != consumed || self.envelope_active.load(Ordering::Relaxed)
    }

    pub fn publish_peak(&self, peak: f32) {
        self.peak.store(peak, Ordering::Relaxed);
    }

    /// Absolute peak of this voice's last rendered block.
    pub fn peak(&self) -> f32 {
        self.peak.load(Ordering::Relaxed)
    }
}

/// Everything the control path and the renderer share.
#[derive(Debug)]
pub struct SharedParams {
    voices: Box<[VoiceParams]>,
    delay_mix: AtomicF32,
    chorus_mix: AtomicF32,
    running: AtomicUsize,
}

impl SharedParams {
    pub fn new(voice_count: usize, delay_mix: f32, chorus_mix: f32) -> Self {
        Self {
            voices: (0..voice_count).map(|_| VoiceParams::default()).collect(),
            delay_mix: AtomicF32::new(delay_mix),
            chorus_mix: AtomicF32::new(chorus_mix),
            running: AtomicUsize::new(0),
        }
    }

    pub fn voices(&self) -> &[VoiceParams] {
        &self.voices
    }

    pub fn voice(&self, index: usize) -> Option<&VoiceParams> {
        self.voices.get(index)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn set_delay_mix(&self, mix: f32) {
        self.delay_mix.store(mix.clamp(0.0, 1.0), Ordering::Relaxed);
    }

    pub fn delay_mix(&self) -> f32 {
        self.delay_mix.load(Ordering::Relaxed)
    }

    pub fn set_chorus_mix(&self, mix: f32) {
        self.chorus_mix.store(mix.clamp(0.0, 1.0), Ordering::Relaxed);
    }

    pub fn chorus_mix(&self) -> f32 {
        self.chorus_mix.load(Ordering::Relaxed)
    }

    pub fn publish_running(&self, count: usize) {
        self.running.store(count, Ordering::Relaxed);
    }

    /// Voices that produced output in the last rendered block.
    pub fn running(&self) -> usize {
        self.running.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_selects_matching_source() {
        assert_eq!(AmpSource::from(Mode::Particle), AmpSource::Envelope);
        assert_eq!(AmpSource::from(Mode::Flow), AmpSource::Lfo);
    }

    #[test]
    fn source_round_trips_through_slot() {
        let params = VoiceParams::default();
        assert_eq!(params.source(), AmpSource::Envelope);
        params.set_source(AmpSource::Lfo);
        assert_eq!(params.source(), AmpSource::Lfo);
    }

    #[test]
    fn pending_trigger_reads_as_active() {
        let params = VoiceParams::default();
        assert!(!params.envelope_active());

        params.request_trigger();
        assert!(params.envelope_active(), "active before the renderer sees it");

        params.publish_envelope(params.trigger_seq(), true);
        assert!(params.envelope_active());

        params.publish_envelope(params.trigger_seq(), false);
        assert!(!params.envelope_active());
    }

    #[test]
    fn trigger_between_blocks_is_not_lost() {
        let params = VoiceParams::default();
        params.request_trigger();
        let handled = params.trigger_seq();
        params.request_trigger();

        // Renderer publishes the older sequence as finished.
        params.publish_envelope(handled, false);
        assert!(params.envelope_active());
    }

    #[test]
    fn effect_mixes_are_clamped() {
        let shared = SharedParams::new(4, 0.5, 0.5);
        shared.set_delay_mix(2.0);
        shared.set_chorus_mix(-1.0);
        assert_eq!(shared.delay_mix(), 1.0);
        assert_eq!(shared.chorus_mix(), 0.0);
        assert_eq!(shared.len(), 4);
    }
}
