/*
Parameter Smoothing
===================

Control values arrive from the simulation at 30-60 Hz. Applied directly, each
update would be a step in the signal, which is an audible click. Two kinds of
smoothing are used:

  LinearRamp   Reach a new target in a fixed time (20 ms by default), however
               far away it is. Used for amplitude, pan gains and the
               enable/disable gate, where "settled within T" matters.

                 target ─────────────────●━━━━━━━━
                                       ╱
                                     ╱   ramp_samples
                 current ━━━━━━━━━━●

  OnePole      Exponential approach, y += (x - y) × coeff. Never finishes, but
               follows a signal that changes every sample (the LFO or envelope
               output after a source switch) without adding a corner.

Coefficient for a one-pole with time constant τ:

    coeff = 1 - exp(-1 / (τ × sample_rate))
*/

/// Fixed-time linear ramp towards a target.
#[derive(Debug, Clone)]
pub struct LinearRamp {
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
    ramp_samples: u32,
}

impl LinearRamp {
    pub fn new(initial: f32, ramp_seconds: f32, sample_rate: f32) -> Self {
        let ramp_samples = (ramp_seconds.max(0.0) * sample_rate).round().max(1.0) as u32;
        Self {
            current: initial,
            target: initial,
            step: 0.0,
            remaining: 0,
            ramp_samples,
        }
    }

    /// Start ramping towards `target`. A no-op if it is already the target.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }
        self.target = target;
        self.remaining = self.ramp_samples;
        self.step = (target - self.current) / self.ramp_samples as f32;
    }

    /// Jump straight to `value`, cancelling any ramp.
    pub fn set_immediate(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.step = 0.0;
        self.remaining = 0;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            if self.remaining == 0 {
                // Land exactly, no accumulated rounding.
                self.current = self.target;
            } else {
                self.current += self.step;
            }
        }
        self.current
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        self.remaining == 0
    }
}

/// One-pole lowpass used as an exponential smoother.
#[derive(Debug, Clone)]
pub struct OnePole {
    value: f32,
    coeff: f32,
}

impl OnePole {
    pub fn new(initial: f32, time_constant: f32, sample_rate: f32) -> Self {
        let samples = (time_constant * sample_rate).max(1.0);
        Self {
            value: initial,
            coeff: 1.0 - (-1.0 / samples).exp(),
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.value += (input - self.value) * self.coeff;
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self, value: f32) {
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_reaches_target_in_ramp_time() {
        // 20 ms at 1 kHz = 20 samples
        let mut ramp = LinearRamp::new(0.0, 0.02, 1_000.0);
        ramp.set_target(1.0);

        for _ in 0..19 {
            let v = ramp.next_sample();
            assert!(v > 0.0 && v < 1.0);
        }
        assert_eq!(ramp.next_sample(), 1.0);
        assert!(ramp.is_settled());
        assert_eq!(ramp.next_sample(), 1.0);
    }

    #[test]
    fn ramp_is_monotonic() {
        let mut ramp = LinearRamp::new(0.8, 0.01, 48_000.0);
        ramp.set_target(-0.4);
        let mut last = ramp.current();
        while !ramp.is_settled() {
            let v = ramp.next_sample();
            assert!(v <= last + 1e-7);
            last = v;
        }
        assert_eq!(last, -0.4);
    }

    #[test]
    fn retarget_mid_ramp_starts_from_current() {
        let mut ramp = LinearRamp::new(0.0, 0.01, 1_000.0);
        ramp.set_target(1.0);
        for _ in 0..5 {
            ramp.next_sample();
        }
        let midway = ramp.current();
        ramp.set_target(0.0);
        let next = ramp.next_sample();
        assert!(next < midway, "ramp turns around without a jump");
        assert!((midway - next) < 0.2);
    }

    #[test]
    fn set_immediate_skips_ramp() {
        let mut ramp = LinearRamp::new(0.0, 1.0, 48_000.0);
        ramp.set_target(1.0);
        ramp.set_immediate(0.3);
        assert!(ramp.is_settled());
        assert_eq!(ramp.next_sample(), 0.3);
    }

    #[test]
    fn one_pole_converges() {
        let mut smoother = OnePole::new(0.0, 0.002, 48_000.0);
        for _ in 0..4_800 {
            smoother.process(1.0);
        }
        assert!((smoother.value() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn one_pole_has_no_step() {
        let mut smoother = OnePole::new(0.0, 0.002, 48_000.0);
        let first = smoother.process(1.0);
        assert!(first > 0.0 && first < 0.05);
    }
}
