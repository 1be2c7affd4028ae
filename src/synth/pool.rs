use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::graph::EffectsPreset;
use crate::io::{
    meter::{meter_channel, MeterFrame, MeterReader},
    AudioBackend, AudioError,
};
use crate::synth::{
    params::{Mode, SharedParams},
    pitch::{random_root, Shade},
    renderer::PoolRenderer,
    voice::Voice,
};

/// Per-poll decay of the held meter peaks.
const METER_DECAY: f32 = 0.85;

/// A fixed set of `max_voices` voices, of which the first `active_count` are
/// audible, feeding one shared effects chain.
///
/// The pool is the control half. [`start`](Self::start) builds a
/// [`PoolRenderer`] from the current state and hands it to the backend;
/// [`stop`](Self::stop) takes it away again.
pub struct VoicePool<B: AudioBackend> {
    config: EngineConfig,
    shared: Arc<SharedParams>,
    voices: Vec<Voice>,
    backend: B,
    rng: SmallRng,
    root: u8,
    shade: Shade,
    mode: Mode,
    active_count: usize,
    effects: EffectsPreset,
    meter: MeterReader,
}

impl<B: AudioBackend> VoicePool<B> {
    pub fn new(config: EngineConfig, backend: B) -> Self {
        let config = config.sanitized();
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let shared = Arc::new(SharedParams::new(
            config.max_voices,
            config.delay.mix,
            config.chorus.mix,
        ));
        let voices = (0..config.max_voices)
            .map(|index| {
                let voice_rng = SmallRng::seed_from_u64(rng.gen());
                Voice::new(shared.clone(), index, &config.canvas, voice_rng)
            })
            .collect();
        let root = random_root(&mut rng);
        let effects = EffectsPreset::random(&config, &mut rng);
        let (_, rx) = meter_channel();

        let mut pool = Self {
            shade: config.shade,
            mode: config.mode,
            config,
            shared,
            voices,
            backend,
            rng,
            root,
            active_count: 0,
            effects,
            meter: MeterReader::new(rx, METER_DECAY),
        };

        let (width, height) = (pool.config.canvas.width, pool.config.canvas.height);
        let initial = pool.config.initial_voices;
        for voice in &mut pool.voices {
            let color = pool.shade.color_from_hue(pool.rng.gen());
            voice.set_pitch(color, pool.shade, pool.root);
            voice.randomize_lfo();
            voice.select_amplitude_source(pool.mode);
            voice.set_amplitude(height * 0.5, initial);
            voice.set_pan(width * 0.5);
            // Every envelope plays once from the start.
            voice.trigger();
        }
        pool.set_active_count(initial);

        debug!(
            voices = pool.voices.len(),
            root = pool.root,
            delay_left = pool.effects.delay_left,
            delay_right = pool.effects.delay_right,
            "voice pool created"
        );
        pool
    }

    /// Enable voices `[0, n)` and disable the rest. `n` is clamped to
    /// `max_voices`; the clamped value is returned.
    pub fn set_active_count(&mut self, n: usize) -> usize {
        let n = n.min(self.voices.len());
        for (index, voice) in self.voices.iter().enumerate() {
            if index < n {
                voice.enable();
            } else {
                voice.disable();
            }
        }

        if n != self.active_count {
            info!(from = self.active_count, to = n, "active voice count changed");
        }
        self.active_count = n;
        n
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn max_voices(&self) -> usize {
        self.voices.len()
    }

    /// Start output. Does nothing when already running.
    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.backend.is_running() {
            return Ok(());
        }

        let sample_rate = self.backend.sample_rate();
        let (tx, rx) = meter_channel();
        let renderer = PoolRenderer::new(
            self.shared.clone(),
            self.effects.build(&self.config, sample_rate),
            sample_rate,
            self.config.smoothing_seconds(),
        )
        .with_meter(tx);

        self.backend.start(renderer)?;
        self.meter.reconnect(rx);
        info!(sample_rate, active = self.active_count, "voice pool started");
        Ok(())
    }

    /// Stop output. Does nothing when already stopped.
    pub fn stop(&mut self) {
        if self.backend.is_running() {
            self.backend.stop();
            self.shared.publish_running(0);
            info!("voice pool stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.backend.is_running()
    }

    /// Retune every voice to `shade`, keeping its stored color and the root.
    pub fn change_shade(&mut self, shade: Shade) {
        self.shade = shade;
        self.retune();
        info!(shade = shade.name(), "shade changed");
    }

    /// Requantize every voice's stored color against the current shade and
    /// root.
    pub fn retune(&mut self) {
        let (shade, root) = (self.shade, self.root);
        for voice in &mut self.voices {
            let color = voice.color();
            voice.set_pitch(color, shade, root);
        }
    }

    /// Restart every envelope from its attack.
    pub fn trigger_all(&self) {
        for voice in &self.voices {
            voice.trigger();
        }
    }

    pub fn shade(&self) -> Shade {
        self.shade
    }

    /// Route every voice's gain to the source `mode` selects.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        for voice in &self.voices {
            voice.select_amplitude_source(mode);
        }
        info!(mode = mode.name(), "mode changed");
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_delay_mix(&self, mix: f32) {
        self.shared.set_delay_mix(mix);
    }

    pub fn delay_mix(&self) -> f32 {
        self.shared.delay_mix()
    }

    pub fn set_chorus_mix(&self, mix: f32) {
        self.shared.set_chorus_mix(mix);
    }

    pub fn chorus_mix(&self) -> f32 {
        self.shared.chorus_mix()
    }

    /// Draw a new root note, new effect constants and new tremolo LFOs, then
    /// retune. Effect and LFO changes are heard from the next `start`.
    pub fn reroll(&mut self) {
        self.root = random_root(&mut self.rng);
        self.effects = EffectsPreset::random(&self.config, &mut self.rng);
        for voice in &mut self.voices {
            voice.randomize_lfo();
        }
        self.retune();
        debug!(root = self.root, "voice pool rerolled");
    }

    pub fn voice(&self, index: usize) -> Option<&Voice> {
        self.voices.get(index)
    }

    pub fn voice_mut(&mut self, index: usize) -> Option<&mut Voice> {
        self.voices.get_mut(index)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn voices_mut(&mut self) -> &mut [Voice] {
        &mut self.voices
    }

    /// Voices that produced output in the last rendered block.
    pub fn running_oscillators(&self) -> usize {
        self.shared.running()
    }

    pub fn root_note(&self) -> u8 {
        self.root
    }

    pub fn effects(&self) -> &EffectsPreset {
        &self.effects
    }

    /// Latest held output peaks.
    pub fn poll_meter(&mut self) -> MeterFrame {
        self.meter.poll()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
