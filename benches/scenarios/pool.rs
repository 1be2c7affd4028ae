//! Benchmarks for a whole pool render: every voice, the bus and the effects.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowsynth::io::OfflineBackend;
use flowsynth::synth::{Mode, VoicePool};
use flowsynth::EngineConfig;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn pool(active: usize, mode: Mode) -> VoicePool<OfflineBackend> {
    let config = EngineConfig {
        max_voices: 100,
        initial_voices: active,
        mode,
        seed: Some(1),
        ..EngineConfig::default()
    };
    let mut pool = VoicePool::new(config, OfflineBackend::new(SAMPLE_RATE));
    pool.start().expect("offline backend start");
    pool
}

pub fn bench_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pool");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Typical: 20 of 100 voices audible, the rest skipped
        let mut typical = pool(20, Mode::Particle);
        group.bench_with_input(BenchmarkId::new("20_of_100_particle", size), &size, |b, _| {
            b.iter(|| typical.backend_mut().render(black_box(&mut left), black_box(&mut right)))
        });

        // Worst case: every voice on
        let mut full = pool(100, Mode::Flow);
        group.bench_with_input(BenchmarkId::new("100_of_100_flow", size), &size, |b, _| {
            b.iter(|| full.backend_mut().render(black_box(&mut left), black_box(&mut right)))
        });

        // Interleaved stereo, as a device callback would request it
        let mut data = vec![0.0f32; size * 2];
        group.bench_with_input(BenchmarkId::new("interleaved_20", size), &size, |b, _| {
            b.iter(|| typical.backend_mut().render_interleaved(black_box(&mut data), 2))
        });
    }

    group.finish();
}
