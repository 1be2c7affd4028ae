use crate::graph::node::{RenderCtx, StereoNode};

/*
Serial Signal Chain (Through)
=============================

Through connects two stereo nodes in series: the first processes the buffers
in-place, then the second processes the result.

  [left, right] ──→ [First] ──→ [Second] ──→ [left, right]

The installation's shared bus is exactly one of these:

    let effects = PingPongDelay::new(sr, 2.0, 0.31, 0.55, 0.7, 0.5)
        .through(StereoChorus::new(sr, 1.0, 0.2, 0.01, 0.05, phase, 0.5));

The whole topology is a concrete type, fixed when it is built. Nothing can be
rewired while a block is in flight, and the compiler sees straight through
both calls.

Both halves stay reachable through `first_mut` / `second_mut` so the render
path can push parameter changes (mix amounts) into them between blocks.
*/

pub struct Through<A, B> {
    first: A,
    second: B,
}

impl<A, B> Through<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &A {
        &self.first
    }

    pub fn second(&self) -> &B {
        &self.second
    }

    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }
}

impl<A: StereoNode, B: StereoNode> StereoNode for Through<A, B> {
    fn process_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        self.first.process_block(left, right, ctx);
        self.second.process_block(left, right, ctx);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::extensions::StereoNodeExt;

    /// Scales both channels by a constant.
    struct Gain(f32);

    impl StereoNode for Gain {
        fn process_block(&mut self, left: &mut [f32], right: &mut [f32], _ctx: &RenderCtx) {
            for s in left.iter_mut().chain(right.iter_mut()) {
                *s *= self.0;
            }
        }
    }

    /// Swaps left and right.
    struct Swap;

    impl StereoNode for Swap {
        fn process_block(&mut self, left: &mut [f32], right: &mut [f32], _ctx: &RenderCtx) {
            left.swap_with_slice(right);
        }
    }

    #[test]
    fn processes_first_then_second() {
        let mut chain = Gain(0.5).through(Swap);
        let mut left = vec![1.0; 8];
        let mut right = vec![2.0; 8];

        chain.process_block(&mut left, &mut right, &RenderCtx::new(48_000.0));

        assert!(left.iter().all(|&s| s == 1.0));
        assert!(right.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn halves_are_reachable() {
        let mut chain = Gain(0.5).through(Gain(2.0));
        chain.second_mut().0 = 4.0;
        assert_eq!(chain.first().0, 0.5);
        assert_eq!(chain.second().0, 4.0);
    }
}
