//! The visual side: a drifting Perlin flow field and the particles it pushes
//! around. Each particle drives the voice with the same index.

pub mod control;
pub mod flow_field;
pub mod particle;

pub use control::{ControlEvent, ControlState};
pub use flow_field::{FlowField, FlowVector};
pub use particle::Particle;

use rand::rngs::SmallRng;

use crate::config::EngineConfig;
use crate::synth::Shade;

pub struct Simulation {
    field: FlowField,
    particles: Vec<Particle>,
    rng: SmallRng,
    width: f32,
    height: f32,
    max_speed: f32,
}

impl Simulation {
    /// One particle per voice slot, scattered at random.
    pub fn new(config: &EngineConfig, noise_seed: u32, shade: Shade, rng: SmallRng) -> Self {
        let canvas = &config.canvas;
        let field = FlowField::new(
            canvas.width,
            canvas.height,
            canvas.cell_size,
            config.flow.noise_increment,
            config.flow.z_increment,
            noise_seed,
        );

        let mut sim = Self {
            field,
            particles: Vec::with_capacity(config.max_voices),
            rng,
            width: canvas.width,
            height: canvas.height,
            max_speed: config.flow.max_speed,
        };
        sim.respawn(config.max_voices, shade);
        sim
    }

    /// Replace every particle with a fresh random one.
    pub fn respawn(&mut self, count: usize, shade: Shade) {
        let (width, height) = (self.width, self.height);
        let rng = &mut self.rng;
        self.particles.clear();
        self.particles
            .extend((0..count).map(|_| Particle::random(rng, width, height, shade)));
    }

    /// One frame: regenerate the field, then move the first `active`
    /// particles. The rest hold still.
    pub fn step(&mut self, active: usize) {
        self.field.regenerate();
        let active = active.min(self.particles.len());
        for particle in &mut self.particles[..active] {
            particle.apply_force(self.field.vector_at(particle.x, particle.y));
            particle.update(self.max_speed);
            particle.wrap_edges(self.width, self.height);
        }
    }

    pub fn set_shade(&mut self, shade: Shade) {
        for particle in &mut self.particles {
            particle.set_shade(shade);
        }
    }

    pub fn set_noise_seed(&mut self, seed: u32) {
        self.field.set_seed(seed);
    }

    /// Drawn opacity of particle `index`, from noise over its transparency.
    pub fn alpha(&self, index: usize) -> f32 {
        self.particles
            .get(index)
            .map_or(0.0, |p| self.field.noise_1d(p.transparency))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn field(&self) -> &FlowField {
        &self.field
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
