use crate::dsp::{
    delay::DelayLine,
    lfo::{map_bipolar, SineLfo},
    mix::MixGains,
};
use crate::graph::{
    node::{RenderCtx, StereoNode},
    pingpong::ordered,
};

/*
Stereo Chorus
=============

Chorus thickens a sound by mixing the dry signal with a delayed copy whose
delay time keeps moving. As the delay shortens the copy is pitched slightly
up, as it lengthens slightly down, so the blend sounds like several players.

Each channel owns its own delay line and its own slow sine LFO:

    lfo(t) ∈ [-1, +1]  ──map──→  delay(t) ∈ [min_delay, max_delay]

    in ──┬──────────────────────────── × dry ──(+)──→ out
         │                                      ↑
         └──→ [ delay line ]──→ read(delay(t)) × wet

The left LFO starts at phase 0, the right one at a random phase, so the two
channels sweep independently and the image widens.

Parameters
----------

  rate        LFO speed, 0.2 Hz by default (one sweep every five seconds).
  min/max     Delay sweep range, 10 ms to 50 ms by default. Past ~50 ms the
              copy starts to read as a separate echo.
  mix         Constant-power wet/dry blend, 0.5 by default.

The delay time is recomputed every sample; fractional reads keep the sweep
free of zipper noise.
*/

pub struct StereoChorus {
    left: DelayLine,
    right: DelayLine,
    lfo_left: SineLfo,
    lfo_right: SineLfo,
    min_delay: f32,
    max_delay: f32,
    gains: MixGains,
}

impl StereoChorus {
    /// Create a chorus.
    ///
    /// - `rate`: LFO speed in Hz
    /// - `min_delay`, `max_delay`: sweep range in seconds, clamped to the buffer
    /// - `right_phase`: starting phase of the right LFO in radians
    pub fn new(
        sample_rate: f32,
        buffer_seconds: f32,
        rate: f32,
        min_delay: f32,
        max_delay: f32,
        right_phase: f32,
        mix: f32,
    ) -> Self {
        let (min_delay, max_delay) = ordered(min_delay, max_delay);
        let buffer_seconds = buffer_seconds.max(max_delay);
        let rate = rate.max(0.0);

        Self {
            left: DelayLine::new(buffer_seconds, sample_rate),
            right: DelayLine::new(buffer_seconds, sample_rate),
            lfo_left: SineLfo::new(rate),
            lfo_right: SineLfo::new(rate).with_phase(right_phase),
            min_delay: min_delay.max(0.0),
            max_delay,
            gains: MixGains::constant_power(mix),
        }
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.gains = MixGains::constant_power(mix);
    }

    pub fn gains(&self) -> MixGains {
        self.gains
    }

    pub fn delay_range(&self) -> (f32, f32) {
        (self.min_delay, self.max_delay)
    }

    /// Phases of the (left, right) LFOs in radians.
    pub fn lfo_phases(&self) -> (f32, f32) {
        (self.lfo_left.phase(), self.lfo_right.phase())
    }
}

impl StereoNode for StereoChorus {
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        debug_assert_eq!(left.len(), right.len());
        let sample_rate = ctx.sample_rate;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (min, max) = (self.min_delay, self.max_delay);
            let delay_l = map_bipolar(self.lfo_left.next_sample(sample_rate), min, max);
            let delay_r = map_bipolar(self.lfo_right.next_sample(sample_rate), min, max);

            self.left.write(*l);
            self.right.write(*r);

            let wet_l = self.left.read_interpolated(delay_l);
            let wet_r = self.right.read_interpolated(delay_r);

            *l = self.gains.apply(*l, wet_l);
            *r = self.gains.apply(*r, wet_r);
        }
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderCtx {
        RenderCtx::new(48_000.0)
    }

    fn chorus(mix: f32) -> StereoChorus {
        StereoChorus::new(48_000.0, 1.0, 0.2, 0.01, 0.05, 1.0, mix)
    }

    #[test]
    fn impulse_returns_inside_sweep_range() {
        let mut node = chorus(1.0);
        let mut left = vec![0.0; 4_096];
        let mut right = vec![0.0; 4_096];
        left[0] = 1.0;

        node.process_block(&mut left, &mut right, &ctx());

        // Wet energy only between 10 ms and 50 ms (480..2400 samples)
        let outside: f32 = left[..470].iter().chain(&left[2_410..]).map(|s| s.abs()).sum();
        let inside: f32 = left[470..2_410].iter().map(|s| s.abs()).sum();
        assert!(outside < 1e-6, "energy outside sweep: {outside}");
        assert!(inside > 0.5);
    }

    #[test]
    fn dry_chorus_preserves_signal() {
        let mut node = chorus(0.0);
        let mut left: Vec<f32> = (0..512).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut right = left.clone();
        let original = left.clone();

        node.process_block(&mut left, &mut right, &ctx());

        for (a, b) in left.iter().zip(&original) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn output_bounded_by_constant_power_gain() {
        let mut node = chorus(0.5);
        let mut left: Vec<f32> = (0..8_192).map(|i| (i as f32 * 0.01).sin()).collect();
        let mut right = left.clone();

        node.process_block(&mut left, &mut right, &ctx());

        // |dry·a + wet·b| ≤ dry + wet = √2 for unit inputs
        assert!(left.iter().chain(&right).all(|s| s.abs() <= std::f32::consts::SQRT_2 + 1e-5));
    }

    #[test]
    fn set_mix_uses_constant_power() {
        let mut node = chorus(0.5);
        for step in 0..=20 {
            let m = step as f32 / 20.0;
            node.set_mix(m);
            let gains = node.gains();
            assert!((gains.wet * gains.wet + gains.dry * gains.dry - 1.0).abs() < 1e-6);
        }

        node.set_mix(0.25);
        let gains = node.gains();
        assert!((gains.wet - 0.5).abs() < 1e-6);
        assert!((gains.dry - 0.75f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn swapped_range_is_reordered() {
        let node = StereoChorus::new(48_000.0, 1.0, 0.2, 0.05, 0.01, 0.0, 0.5);
        assert_eq!(node.delay_range(), (0.01, 0.05));
    }
}
