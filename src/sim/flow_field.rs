/*
Perlin Flow Field
=================

The canvas is cut into a grid of square cells. Every frame each cell gets a
unit vector whose angle comes from 3D Perlin noise:

    angle = noise(col × inc, row × inc, z) × 4 × TAU

    (noise remapped from [-1, 1] to [0, 1] first)

Neighbouring cells sample nearby points of noise space, so their vectors
point in similar directions and the field has coherent currents. The factor
4 × TAU lets one sweep of noise wind the direction around four times, which
gives tighter swirls than a single turn.

z advances by a small step after every row and keeps its value across
frames, so the whole field drifts slowly over time instead of being static.

    grid = floor(width / cell) × floor(height / cell)
*/

use noise::{NoiseFn, Perlin};
use std::f64::consts::TAU;

/// One unit vector per cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlowVector {
    pub x: f32,
    pub y: f32,
}

impl FlowVector {
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos() as f32,
            y: angle.sin() as f32,
        }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

pub struct FlowField {
    noise: Perlin,
    seed: u32,
    width: f32,
    height: f32,
    cols: usize,
    rows: usize,
    increment: f64,
    z_increment: f64,
    z: f64,
    vectors: Vec<FlowVector>,
}

impl FlowField {
    pub fn new(
        width: f32,
        height: f32,
        cell_size: f32,
        increment: f64,
        z_increment: f64,
        seed: u32,
    ) -> Self {
        let cell_size = cell_size.max(1.0);
        let cols = ((width / cell_size).floor() as usize).max(1);
        let rows = ((height / cell_size).floor() as usize).max(1);

        let mut field = Self {
            noise: Perlin::new(seed),
            seed,
            width,
            height,
            cols,
            rows,
            increment,
            z_increment,
            z: 0.0,
            vectors: vec![FlowVector::default(); cols * rows],
        };
        field.regenerate();
        field
    }

    /// Recompute every cell vector and advance z.
    pub fn regenerate(&mut self) {
        for row in 0..self.rows {
            let y = row as f64 * self.increment;
            for col in 0..self.cols {
                let x = col as f64 * self.increment;
                let n = (self.noise.get([x, y, self.z]) + 1.0) * 0.5;
                self.vectors[col + row * self.cols] = FlowVector::from_angle(n * TAU * 4.0);
            }
            self.z += self.z_increment;
        }
    }

    /// Vector of the cell containing canvas point `(x, y)`.
    ///
    /// Points off the canvas use the nearest edge cell.
    pub fn vector_at(&self, x: f32, y: f32) -> FlowVector {
        let col = cell_index(x, self.width, self.cols);
        let row = cell_index(y, self.height, self.rows);
        self.vectors[col + row * self.cols]
    }

    pub fn set_seed(&mut self, seed: u32) {
        self.seed = seed;
        self.noise = Perlin::new(seed);
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Sample the field's noise at a 1D position, in `[0, 1]`.
    pub fn noise_1d(&self, t: f64) -> f32 {
        ((self.noise.get([t, 0.0, 0.0]) + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn vectors(&self) -> &[FlowVector] {
        &self.vectors
    }

    pub fn z(&self) -> f64 {
        self.z
    }
}

/// `floor(p × (n - 1) / extent)`, clamped to a valid index.
fn cell_index(p: f32, extent: f32, n: usize) -> usize {
    if extent <= 0.0 || !p.is_finite() {
        return 0;
    }
    let raw = (p * (n - 1) as f32 / extent).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(n - 1)
    }
}
