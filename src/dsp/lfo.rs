//! Low Frequency Oscillator (LFO) helpers.

/*
Low Frequency Oscillators
=========================

An LFO is a sine running below hearing (here 0.01 Hz to ~2 Hz) whose output
steers a parameter instead of being listened to. Two of them matter in this
crate:

  tremolo     A per-voice LFO multiplies the voice amplitude in Flow mode.
              It is used raw (bipolar), so the perceived pulse runs at twice
              the LFO rate.

  chorus      A 0.2 Hz LFO per channel is range-mapped from [-1, +1] onto a
              delay time in [10 ms, 50 ms] and written into the delay line
              every sample.

Range Mapping
-------------

A bipolar signal is squeezed onto [min, max] by first going unipolar:

    unipolar = (bipolar + 1) / 2
    value    = min + unipolar × (max - min)

    bipolar   value (min=0.01, max=0.05)
    -1.0      0.01
     0.0      0.03
    +1.0      0.05
*/

use crate::dsp::oscillator::SineOscillator;

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Map a bipolar signal onto `[min, max]`.
#[inline]
pub fn map_bipolar(bipolar: f32, min: f32, max: f32) -> f32 {
    min + bipolar_to_unipolar(bipolar.clamp(-1.0, 1.0)) * (max - min)
}

/// Linear map of `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// No clamping: callers that need a bounded result clamp afterwards.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if in_max == in_min {
        return out_min;
    }
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// Sine LFO with fixed rate, starting phase and amplitude.
#[derive(Debug, Clone)]
pub struct SineLfo {
    osc: SineOscillator,
}

impl SineLfo {
    pub fn new(frequency: f32) -> Self {
        Self {
            osc: SineOscillator::new(frequency, 1.0),
        }
    }

    pub fn with_phase(self, phase: f32) -> Self {
        Self {
            osc: self.osc.with_phase(phase),
        }
    }

    pub fn frequency(&self) -> f32 {
        self.osc.frequency()
    }

    pub fn phase(&self) -> f32 {
        self.osc.phase()
    }

    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        self.osc.next_sample(sample_rate)
    }
}
