use rand::Rng;

use crate::sim::flow_field::FlowVector;
use crate::synth::pitch::Shade;

const TRANSPARENCY_STEP: f64 = 0.01;

/// One particle: kinematics plus the visual state the front-end draws.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    ax: f32,
    ay: f32,
    /// Fixed for the particle's life, in `[0, 1)`.
    pub hue: f32,
    /// `hue` mapped onto the current shade's color range.
    pub color: f32,
    /// Noise-space position driving the drawn alpha.
    pub transparency: f64,
}

impl Particle {
    /// A resting particle at a random canvas position with a random hue.
    pub fn random<R: Rng>(rng: &mut R, width: f32, height: f32, shade: Shade) -> Self {
        let x = rng.gen_range(0.0..width.max(f32::MIN_POSITIVE));
        let y = rng.gen_range(0.0..height.max(f32::MIN_POSITIVE));
        let hue: f32 = rng.gen();

        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            ax: 0.0,
            ay: 0.0,
            hue,
            color: shade.color_from_hue(hue),
            transparency: rng.gen(),
        }
    }

    pub fn apply_force(&mut self, force: FlowVector) {
        self.ax += force.x;
        self.ay += force.y;
    }

    /// Integrate one frame: velocity += acceleration (speed-limited),
    /// position += velocity, acceleration cleared.
    pub fn update(&mut self, max_speed: f32) {
        self.vx += self.ax;
        self.vy += self.ay;
        let speed = (self.vx * self.vx + self.vy * self.vy).sqrt();
        if speed > max_speed && speed > 0.0 {
            let scale = max_speed / speed;
            self.vx *= scale;
            self.vy *= scale;
        }

        self.x += self.vx;
        self.y += self.vy;
        self.ax = 0.0;
        self.ay = 0.0;
        self.transparency += TRANSPARENCY_STEP;
    }

    /// Wrap to the opposite edge when past one. The wrapped coordinate lands
    /// exactly on the edge, which the voice reads as a boundary crossing.
    ///
    /// Returns whether the particle wrapped.
    pub fn wrap_edges(&mut self, width: f32, height: f32) -> bool {
        let mut wrapped = false;
        if self.x > width {
            self.x = 0.0;
            wrapped = true;
        } else if self.x < 0.0 {
            self.x = width;
            wrapped = true;
        }
        if self.y > height {
            self.y = 0.0;
            wrapped = true;
        } else if self.y < 0.0 {
            self.y = height;
            wrapped = true;
        }
        wrapped
    }

    pub fn set_shade(&mut self, shade: Shade) {
        self.color = shade.color_from_hue(self.hue);
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}
