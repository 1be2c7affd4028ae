use crate::dsp::{delay::DelayLine, mix::MixGains};
use crate::graph::node::{RenderCtx, StereoNode};

/*
Ping-Pong Delay
===============

Two delay lines whose feedback paths are crossed: whatever comes out of the
left line is fed back into the RIGHT line, and vice versa. An impulse on the
left therefore echoes left, right, left, right... bouncing across the field.

        in_L ──(+)──→ [ delay L ] ──┬──────────────→ wet_L
                ↑                   │
                │                   ╳ × feedback
                │                   │
        in_R ──(+)──→ [ delay R ] ──┴──────────────→ wet_R

    write_L = in_L + feedback × out_R(previous sample)
    write_R = in_R + feedback × out_L(previous sample)

    out_L = dry × in_L + wet × delayed_L
    out_R = dry × in_R + wet × delayed_R

The two delay times are drawn once, at construction, so the left and right
echoes drift against each other instead of lining up. With feedback below 1
every round trip is quieter than the last (0.7 → each echo at 70%, a full
L→R→L round at 49%), so the network always decays.

The wet/dry blend uses the constant-power law from `dsp::mix`.
*/

/// Highest feedback accepted; anything closer to 1 rings forever.
const MAX_FEEDBACK: f32 = 0.99;

pub struct PingPongDelay {
    left: DelayLine,
    right: DelayLine,
    feedback: f32,
    gains: MixGains,
    last_left: f32,
    last_right: f32,
}

impl PingPongDelay {
    /// Build with explicit delay times.
    ///
    /// - `max_delay`: buffer length in seconds, times are clamped to it
    /// - `feedback`: cross-feedback coefficient, clamped to `[0, 0.99]`
    /// - `mix`: wet amount in `[0, 1]`
    pub fn new(
        sample_rate: f32,
        max_delay: f32,
        left_time: f32,
        right_time: f32,
        feedback: f32,
        mix: f32,
    ) -> Self {
        let mut left = DelayLine::new(max_delay, sample_rate);
        let mut right = DelayLine::new(max_delay, sample_rate);
        left.set_delay(left_time);
        right.set_delay(right_time);

        Self {
            left,
            right,
            feedback: feedback.clamp(0.0, MAX_FEEDBACK),
            gains: MixGains::constant_power(mix),
            last_left: 0.0,
            last_right: 0.0,
        }
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.gains = MixGains::constant_power(mix);
    }

    pub fn gains(&self) -> MixGains {
        self.gains
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, MAX_FEEDBACK);
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Current (left, right) delay times in seconds.
    pub fn delay_times(&self) -> (f32, f32) {
        (self.left.delay(), self.right.delay())
    }
}

impl StereoNode for PingPongDelay {
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32], _ctx: &RenderCtx) {
        debug_assert_eq!(left.len(), right.len());

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let dry_l = *l;
            let dry_r = *r;

            self.left.write(dry_l + self.feedback * self.last_right);
            self.right.write(dry_r + self.feedback * self.last_left);

            let wet_l = self.left.read();
            let wet_r = self.right.read();
            self.last_left = wet_l;
            self.last_right = wet_r;

            *l = self.gains.apply(dry_l, wet_l);
            *r = self.gains.apply(dry_r, wet_r);
        }
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.last_left = 0.0;
        self.last_right = 0.0;
    }
}

pub(crate) fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
