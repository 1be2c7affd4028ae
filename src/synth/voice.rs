use rand::{rngs::SmallRng, Rng};
use std::f32::consts::TAU;
use std::sync::Arc;

use crate::config::CanvasConfig;
use crate::dsp::{
    envelope::Envelope,
    lfo::{map_range, SineLfo},
    mix::constant_power_pan,
    oscillator::SineOscillator,
    smoother::{LinearRamp, OnePole},
};
use crate::synth::{
    params::{AmpSource, Mode, SharedParams, VoiceParams},
    pitch::{random_harmonic, Pitch, Shade},
};

/*
Particle Voice
==============

One voice per particle, split in two halves that never touch each other
directly:

  Voice         Control half, owned by the pool. Turns particle state into
                parameter values and stores them in the voice's slots.

  RenderVoice   Render half, owned by the renderer. Reads the slots once per
                block and synthesizes.

Signal path of the render half:

    SineOscillator ──→ (× amplitude ramp) ──→ (× gain) ──→ (× gate) ──┬─→ × left ramp  → L
                                                 ↑                     └─→ × right ramp → R
                                  Envelope ──┐   │
                                             ├──→ OnePole
                                  SineLfo ───┘  (selected by AmpSource)

  amplitude   Particle height: top of the canvas loud (0.7), bottom quiet
              (0.2), divided by the number of active voices.
  pan         Particle x across the canvas, -1 (left) to +1 (right), turned
              into constant-power channel gains.
  gain        Envelope in Particle mode, LFO in Flow mode. Both keep running
              so a switch picks up mid-curve; the one-pole rounds the corner.
  gate        0 → 1 on enable, 1 → 0 on disable. A voice whose gate has
              closed is skipped entirely.
*/

pub const LOUDEST: f32 = 0.7;
pub const QUIETEST: f32 = 0.2;
pub const LFO_MIN_FREQUENCY: f32 = 0.01;
pub const LFO_MAX_FREQUENCY: f32 = 2.01;

/// Time constant of the gain-source smoother.
const GAIN_SMOOTHING: f32 = 0.002;

/// Control-side handle for one voice.
pub struct Voice {
    shared: Arc<SharedParams>,
    index: usize,
    color: f32,
    width: f32,
    height: f32,
    rng: SmallRng,
}

impl Voice {
    pub(crate) fn new(
        shared: Arc<SharedParams>,
        index: usize,
        canvas: &CanvasConfig,
        rng: SmallRng,
    ) -> Self {
        debug_assert!(index < shared.len());
        Self {
            shared,
            index,
            color: 0.0,
            width: canvas.width,
            height: canvas.height,
            rng,
        }
    }

    fn params(&self) -> &VoiceParams {
        &self.shared.voices()[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Quantize `color` onto the shade's scale above `root` and pick a random
    /// harmonic of it.
    pub fn set_pitch(&mut self, color: f32, shade: Shade, root: u8) {
        self.color = color;
        let pitch = Pitch::new(color, shade, root, random_harmonic(&mut self.rng));
        self.params().set_oscillator(pitch.frequency, pitch.amplitude);
    }

    /// Store a color without retuning; the next shade change picks it up.
    pub fn set_color(&mut self, color: f32) {
        self.color = color;
    }

    /// Color last passed to [`set_pitch`](Self::set_pitch) or
    /// [`set_color`](Self::set_color).
    pub fn color(&self) -> f32 {
        self.color
    }

    pub fn frequency(&self) -> f32 {
        self.params().frequency()
    }

    pub fn oscillator_amplitude(&self) -> f32 {
        self.params().osc_amplitude()
    }

    pub fn set_amplitude(&self, y: f32, active_count: usize) {
        let loudness = map_range(y, 0.0, self.height, LOUDEST, QUIETEST).clamp(QUIETEST, LOUDEST);
        self.params().set_amplitude(loudness / active_count.max(1) as f32);
    }

    pub fn amplitude(&self) -> f32 {
        self.params().amplitude()
    }

    pub fn set_pan(&self, x: f32) {
        let pan = map_range(x, 0.0, self.width, -1.0, 1.0).clamp(-1.0, 1.0);
        self.params().set_pan(pan);
    }

    pub fn pan(&self) -> f32 {
        self.params().pan()
    }

    pub fn select_amplitude_source(&self, mode: Mode) {
        self.params().set_source(AmpSource::from(mode));
    }

    pub fn amplitude_source(&self) -> AmpSource {
        self.params().source()
    }

    /// Retrigger the envelope if `(x, y)` is on or past a canvas edge.
    ///
    /// Only Particle mode reacts; returns whether a retrigger was requested.
    pub fn on_boundary_cross(&self, mode: Mode, x: f32, y: f32) -> bool {
        if mode != Mode::Particle {
            return false;
        }
        let crossed = x <= 0.0 || x >= self.width || y <= 0.0 || y >= self.height;
        if crossed {
            self.trigger();
        }
        crossed
    }

    /// Restart the envelope unconditionally.
    pub fn trigger(&self) {
        self.params().request_trigger();
    }

    pub fn envelope_active(&self) -> bool {
        self.params().envelope_active()
    }

    pub fn enable(&self) {
        self.params().set_enabled(true);
    }

    pub fn disable(&self) {
        self.params().set_enabled(false);
    }

    pub fn is_enabled(&self) -> bool {
        self.params().enabled()
    }

    /// Peak of the voice's last rendered block.
    pub fn peak(&self) -> f32 {
        self.params().peak()
    }

    /// Draw new tremolo LFO constants. Takes effect when the renderer is next
    /// built.
    pub fn randomize_lfo(&mut self) {
        let frequency = self.rng.gen_range(LFO_MIN_FREQUENCY..LFO_MAX_FREQUENCY);
        let phase = self.rng.gen_range(0.0..TAU);
        self.params().set_lfo(frequency, phase);
    }
}

/// Render-side state for one voice.
pub struct RenderVoice {
    osc: SineOscillator,
    lfo: SineLfo,
    envelope: Envelope,
    gain: OnePole,
    amplitude: LinearRamp,
    left: LinearRamp,
    right: LinearRamp,
    gate: LinearRamp,
    seen_seq: u32,
}

impl RenderVoice {
    pub fn new(params: &VoiceParams, sample_rate: f32, smoothing_seconds: f32) -> Self {
        let (lfo_frequency, lfo_phase) = params.lfo();
        let (left, right) = constant_power_pan(params.pan());

        Self {
            osc: SineOscillator::new(params.frequency(), params.osc_amplitude()),
            lfo: SineLfo::new(lfo_frequency).with_phase(lfo_phase),
            envelope: Envelope::new(sample_rate),
            gain: OnePole::new(0.0, GAIN_SMOOTHING, sample_rate),
            amplitude: LinearRamp::new(params.amplitude(), smoothing_seconds, sample_rate),
            left: LinearRamp::new(left, smoothing_seconds, sample_rate),
            right: LinearRamp::new(right, smoothing_seconds, sample_rate),
            // Always fade in, even when enabled from the start.
            gate: LinearRamp::new(0.0, smoothing_seconds, sample_rate),
            // Triggers requested before this voice existed still fire.
            seen_seq: params.consumed_seq(),
        }
    }

    /// Whether the voice still has anything to render.
    pub fn is_running(&self) -> bool {
        self.gate.target() > 0.0 || self.gate.current() > 0.0
    }

    /// Mix one block of this voice into `left`/`right`.
    ///
    /// Returns true if the voice was running this block.
    pub fn render_add(
        &mut self,
        params: &VoiceParams,
        left: &mut [f32],
        right: &mut [f32],
        sample_rate: f32,
    ) -> bool {
        debug_assert_eq!(left.len(), right.len());

        let seq = params.trigger_seq();
        if seq != self.seen_seq {
            self.envelope.trigger();
            self.seen_seq = seq;
        }

        self.gate.set_target(if params.enabled() { 1.0 } else { 0.0 });

        if !self.is_running() {
            // Silent: keep the envelope clock honest so the state published
            // to the control side stays truthful.
            self.envelope.advance(left.len() as u32);
            params.publish_envelope(seq, self.envelope.is_active());
            params.publish_peak(0.0);
            return false;
        }

        self.osc.set_frequency(params.frequency());
        self.osc.set_amplitude(params.osc_amplitude());
        self.amplitude.set_target(params.amplitude());
        let (pan_left, pan_right) = constant_power_pan(params.pan());
        self.left.set_target(pan_left);
        self.right.set_target(pan_right);
        let source = params.source();

        let mut peak = 0.0f32;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let envelope = self.envelope.next_sample();
            let lfo = self.lfo.next_sample(sample_rate);
            let gain = self.gain.process(match source {
                AmpSource::Envelope => envelope,
                AmpSource::Lfo => lfo,
            });

            let sample = self.osc.next_sample(sample_rate)
                * self.amplitude.next_sample()
                * gain
                * self.gate.next_sample();

            *l += sample * self.left.next_sample();
            *r += sample * self.right.next_sample();
            peak = peak.max(sample.abs());
        }

        params.publish_envelope(seq, self.envelope.is_active());
        params.publish_peak(peak);
        true
    }
}
