//! Benchmarks for low-level DSP primitives.

mod delay;
mod effects;
mod envelope;

pub use delay::bench_delay;
pub use effects::bench_effects;
pub use envelope::bench_envelope;
