use std::f32::consts::TAU;

/// Phase-accumulating sine oscillator.
///
/// Phase is kept in radians in `[0, TAU)`. Frequency and amplitude can change
/// between any two samples without a phase jump, so retuning is click-free.
#[derive(Debug, Clone)]
pub struct SineOscillator {
    phase: f32,
    frequency: f32,
    amplitude: f32,
}

impl SineOscillator {
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            phase: 0.0,
            frequency,
            amplitude,
        }
    }

    /// Start at `phase` radians instead of 0.
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase.rem_euclid(TAU);
        self
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.max(0.0);
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let out = self.phase.sin() * self.amplitude;

        self.phase += TAU * self.frequency / sample_rate;
        if self.phase >= TAU {
            self.phase -= TAU;
        }

        out
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }
}
