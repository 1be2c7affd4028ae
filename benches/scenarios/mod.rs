//! Full render path benchmarks.

mod pool;

pub use pool::bench_pool;
