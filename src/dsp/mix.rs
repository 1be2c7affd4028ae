//! Constant-power crossfade and pan laws.

/*
Constant-Power Mixing
=====================

Effects blend the untouched input (dry) with the processed signal (wet):

    output = dry × dry_gain + wet × wet_gain

A LINEAR crossfade (dry_gain = 1 - m, wet_gain = m) dips in loudness at the
middle: two uncorrelated signals at 50% amplitude each carry only half the
power of one at 100%. Power adds, amplitude doesn't.

The CONSTANT-POWER law uses square roots instead:

    wet_gain = √m
    dry_gain = √(1 - m)

    wet_gain² + dry_gain² = m + (1 - m) = 1   for every m in [0, 1]

      m     dry     wet
     0.0   1.000   0.000
     0.25  0.866   0.500
     0.5   0.707   0.707
     1.0   0.000   1.000

Delay echoes and chorus copies are largely uncorrelated with the dry input,
so this keeps perceived loudness flat across the whole mix range.


Constant-Power Panning
----------------------

The same idea places a mono voice in the stereo field. Pan p in [-1, +1] is
turned into an angle on a quarter circle:

    θ = (p + 1) × π/4
    left  = cos θ
    right = sin θ

    p = -1  →  (1.000, 0.000)   hard left
    p =  0  →  (0.707, 0.707)   centre
    p = +1  →  (0.000, 1.000)   hard right

left² + right² = 1 everywhere, so a voice sweeping across the field keeps
its loudness.
*/

use std::f32::consts::FRAC_PI_4;

/// Dry and wet gains for a given mix amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixGains {
    pub dry: f32,
    pub wet: f32,
}

impl MixGains {
    /// Constant-power gains for `mix` in `[0, 1]` (clamped).
    #[inline]
    pub fn constant_power(mix: f32) -> Self {
        let mix = mix.clamp(0.0, 1.0);
        Self {
            dry: (1.0 - mix).sqrt(),
            wet: mix.sqrt(),
        }
    }

    #[inline]
    pub fn apply(&self, dry: f32, wet: f32) -> f32 {
        dry * self.dry + wet * self.wet
    }
}

impl Default for MixGains {
    fn default() -> Self {
        Self::constant_power(0.5)
    }
}

/// Left/right gains for `pan` in `[-1, 1]` (clamped).
#[inline]
pub fn constant_power_pan(pan: f32) -> (f32, f32) {
    let theta = (pan.clamp(-1.0, 1.0) + 1.0) * FRAC_PI_4;
    (theta.cos(), theta.sin())
}
