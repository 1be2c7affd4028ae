/*
Two-Segment Envelope
====================

A percussive amplitude curve made of two straight lines:

  Level
    1.0 ┐  ╱╲
        │ ╱  ╲
        │╱     ╲___
    0.0 └───────────╲────→ Time
        <A>  <---D--->
       20ms    500ms

Segment 1 (attack) ramps 0 → 1, segment 2 (decay) ramps 1 → 0. There is no
sustain and no gate: the curve plays from start to end once per trigger.

Vocabulary
----------

  cursor      Position inside the curve, in samples since the last trigger.
              The curve is a pure function of the cursor, so the envelope
              has no hidden state beyond it.

  trigger     Move the cursor back to 0. This is a HARD retrigger: whatever
              was playing is cut off and the curve restarts from silence.
              The short attack masks the discontinuity.

  active      The cursor is still before the end of the curve.


The Math
--------

    attack_samples = attack_time × sample_rate
    decay_samples  = decay_time  × sample_rate

    cursor < attack_samples:   level = cursor / attack_samples
    cursor < total:            level = 1 - (cursor - attack_samples) / decay_samples
    otherwise:                 level = 0, idle
*/

/// Where the cursor currently sits on the curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,   // Past the end of the curve, level = 0
    Attack, // Rising 0 → 1
    Decay,  // Falling 1 → 0
}

pub const DEFAULT_ATTACK: f32 = 0.02;
pub const DEFAULT_DECAY: f32 = 0.5;

pub struct Envelope {
    attack_samples: u32,
    decay_samples: u32,
    cursor: u32,
    level: f32,
}

impl Envelope {
    /// The installation's "boing": 20 ms up, 500 ms down.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_segments(sample_rate, DEFAULT_ATTACK, DEFAULT_DECAY)
    }

    pub fn with_segments(sample_rate: f32, attack: f32, decay: f32) -> Self {
        let to_samples =
            |seconds: f32| (seconds.max(crate::MIN_TIME) * sample_rate).round().max(1.0) as u32;
        let attack_samples = to_samples(attack);
        let decay_samples = to_samples(decay);

        Self {
            attack_samples,
            decay_samples,
            // Parked past the end until the first trigger.
            cursor: attack_samples + decay_samples,
            level: 0.0,
        }
    }

    /// Restart the curve from amplitude 0, wherever the cursor is.
    pub fn trigger(&mut self) {
        self.cursor = 0;
        self.level = 0.0;
    }

    fn total_samples(&self) -> u32 {
        self.attack_samples + self.decay_samples
    }

    /// Output the level at the cursor, then advance it by one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let cursor = self.cursor;

        self.level = if cursor < self.attack_samples {
            cursor as f32 / self.attack_samples as f32
        } else if cursor < self.total_samples() {
            let into_decay = (cursor - self.attack_samples) as f32;
            1.0 - into_decay / self.decay_samples as f32
        } else {
            0.0
        };

        if cursor < self.total_samples() {
            self.cursor += 1;
        }

        debug_assert!((0.0..=1.0).contains(&self.level));
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Move the cursor forward without producing output.
    pub fn advance(&mut self, samples: u32) {
        self.cursor = self.cursor.saturating_add(samples).min(self.total_samples());
        if !self.is_active() {
            self.level = 0.0;
        }
    }

    /// True while the cursor is before the end of the curve.
    pub fn is_active(&self) -> bool {
        self.cursor < self.total_samples()
    }

    /// Last level produced by [`next_sample`](Self::next_sample).
    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        if self.cursor < self.attack_samples {
            EnvelopeState::Attack
        } else if self.cursor < self.total_samples() {
            EnvelopeState::Decay
        } else {
            EnvelopeState::Idle
        }
    }

    /// Park the cursor past the end without playing.
    pub fn reset(&mut self) {
        self.cursor = self.total_samples();
        self.level = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn render_samples(env: &mut Envelope, samples: usize) -> f32 {
        let mut last = 0.0;
        for _ in 0..samples {
            last = env.next_sample();
        }
        last
    }

    #[test]
    fn idle_until_triggered() {
        let mut env = Envelope::new(SAMPLE_RATE);
        assert!(!env.is_active());
        assert_eq!(env.state(), EnvelopeState::Idle);
        assert_eq!(render_samples(&mut env, 10), 0.0);
    }

    #[test]
    fn attack_reaches_full_level() {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.trigger();

        // 20 ms at 1 kHz = 20 samples of attack, sample 20 is the peak.
        render_samples(&mut env, 20);
        assert_eq!(env.state(), EnvelopeState::Decay);
        assert!((env.next_sample() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn decay_returns_to_idle() {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.trigger();

        render_samples(&mut env, 20 + 250);
        let midway = env.level();
        assert!((midway - 0.5).abs() < 0.01, "halfway through decay, got {midway}");

        render_samples(&mut env, 260);
        assert!(!env.is_active());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn retrigger_restarts_from_zero_at_any_position() {
        for offset in [0usize, 5, 19, 20, 100, 519, 520, 2_000] {
            let mut env = Envelope::new(SAMPLE_RATE);
            env.trigger();
            render_samples(&mut env, offset);

            env.trigger();
            assert!(env.is_active(), "active after retrigger at {offset}");
            assert_eq!(env.level(), 0.0);
            assert_eq!(env.next_sample(), 0.0, "curve restarts from 0 at {offset}");
            assert!(env.next_sample() > 0.0);
        }
    }

    #[test]
    fn advance_skips_ahead() {
        let mut env = Envelope::new(SAMPLE_RATE);
        env.trigger();
        env.advance(20 + 250);
        assert_eq!(env.state(), EnvelopeState::Decay);
        assert!((env.next_sample() - 0.5).abs() < 0.01);

        env.advance(10_000);
        assert!(!env.is_active());
        assert_eq!(env.level(), 0.0);
    }

    #[test]
    fn levels_stay_in_unit_range() {
        let mut env = Envelope::with_segments(48_000.0, 0.001, 0.01);
        env.trigger();
        let mut buffer = vec![0.0; 1_024];
        env.render(&mut buffer);
        assert!(buffer.iter().all(|s| (0.0..=1.0).contains(s)));
    }
}
