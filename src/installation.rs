use rand::{rngs::SmallRng, SeedableRng};
use tracing::{debug, error, info};

use crate::config::EngineConfig;
use crate::io::{meter::MeterFrame, AudioBackend, AudioError};
use crate::sim::{ControlEvent, ControlState, Simulation};
use crate::synth::VoicePool;

/*
Installation
============

Ties the three parts together and is the only thing a front-end talks to:

    ControlEvent ──→ handle() ──→ ControlState
                        │
                        ├──→ Simulation   (particles, flow field)
                        └──→ VoicePool    (voices, output)

    tick():  Simulation::step ──→ for each active particle i:
                                      voice i amplitude ← y
                                      voice i pan       ← x
                                      voice i boundary  ← (x, y)

The front-end calls tick() once per frame at ControlState::frame_rate.
*/

pub struct Installation<B: AudioBackend> {
    state: ControlState,
    sim: Simulation,
    pool: VoicePool<B>,
}

impl<B: AudioBackend> Installation<B> {
    /// Build the simulation and the voice pool. Output is not started.
    pub fn new(config: EngineConfig, backend: B) -> Self {
        let config = config.sanitized();
        let state = ControlState::from_config(&config);
        let rng = match config.seed {
            // Offset so particles and voices draw from different streams.
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(1)),
            None => SmallRng::from_entropy(),
        };
        let sim = Simulation::new(&config, state.noise_seed, state.shade, rng);
        let pool = VoicePool::new(config, backend);

        let mut installation = Self { state, sim, pool };
        installation.sync_voice_colors();
        installation.pool.retune();
        installation
    }

    /// Start output without rerolling anything.
    pub fn start(&mut self) -> Result<(), AudioError> {
        self.pool.start()?;
        self.state.audio_running = true;
        Ok(())
    }

    /// Advance one frame. Returns `false` when frozen.
    pub fn tick(&mut self) -> bool {
        if self.state.frozen {
            return false;
        }

        let active = self.state.active_voices;
        self.sim.step(active);

        let mode = self.state.mode;
        let pairs = self.pool.voices().iter().zip(self.sim.particles());
        for (voice, particle) in pairs.take(active) {
            voice.set_amplitude(particle.y, active);
            voice.set_pan(particle.x);
            voice.on_boundary_cross(mode, particle.x, particle.y);
        }
        true
    }

    pub fn handle(&mut self, event: ControlEvent) -> Result<(), AudioError> {
        debug!(?event, "control event");
        match event {
            ControlEvent::SetShade(shade) => {
                self.state.shade = shade;
                self.sim.set_shade(shade);
                self.sync_voice_colors();
                self.pool.change_shade(shade);
            }
            ControlEvent::SetMode(mode) => {
                self.state.mode = mode;
                self.pool.set_mode(mode);
            }
            ControlEvent::SetActiveVoiceCount(n) => {
                self.state.active_voices = self.pool.set_active_count(n);
            }
            ControlEvent::NewSeed => {
                let seed = self.state.bump_seed();
                self.sim.set_noise_seed(seed);
                info!(seed, "noise seed changed");
            }
            ControlEvent::Start => self.restart()?,
            ControlEvent::Stop => {
                self.pool.stop();
                self.state.audio_running = false;
                self.state.frozen = true;
            }
            ControlEvent::Pause => self.state.frozen = true,
            ControlEvent::Resume => {
                if !self.pool.is_running() {
                    self.start()?;
                }
                self.state.frozen = false;
            }
            ControlEvent::SetFrameRate(fps) => {
                let fps = self.state.set_frame_rate(fps);
                info!(fps, "frame rate changed");
            }
        }
        Ok(())
    }

    /// Stop, draw a new root note, new particles and new effect constants,
    /// then start again.
    fn restart(&mut self) -> Result<(), AudioError> {
        self.pool.stop();
        self.state.audio_running = false;

        self.sim.respawn(self.pool.max_voices(), self.state.shade);
        self.sync_voice_colors();
        self.pool.reroll();
        self.pool.trigger_all();

        self.state.frozen = false;
        if let Err(err) = self.start() {
            error!(%err, "restart failed");
            return Err(err);
        }
        info!(root = self.pool.root_note(), "installation restarted");
        Ok(())
    }

    fn sync_voice_colors(&mut self) {
        let pairs = self.pool.voices_mut().iter_mut().zip(self.sim.particles());
        for (voice, particle) in pairs {
            voice.set_color(particle.color);
        }
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn pool(&self) -> &VoicePool<B> {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut VoicePool<B> {
        &mut self.pool
    }

    pub fn poll_meter(&mut self) -> MeterFrame {
        self.pool.poll_meter()
    }
}
