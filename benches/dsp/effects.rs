//! Benchmarks for the stereo bus effects.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowsynth::graph::{EffectsPreset, PingPongDelay, RenderCtx, StereoChorus, StereoNode};
use flowsynth::EngineConfig;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/effects");
    let ctx = RenderCtx::new(SAMPLE_RATE);
    let config = EngineConfig::default();
    let preset = EffectsPreset {
        delay_left: 0.35,
        delay_right: 0.6,
        chorus_phase: 1.0,
    };

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.5).collect();
        let mut left = input.clone();
        let mut right = input.clone();

        let mut delay = PingPongDelay::new(SAMPLE_RATE, 2.0, 0.35, 0.6, 0.7, 0.5);
        group.bench_with_input(BenchmarkId::new("pingpong", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                delay.process_block(black_box(&mut left), black_box(&mut right), &ctx);
            })
        });

        let mut chorus = StereoChorus::new(SAMPLE_RATE, 1.0, 0.2, 0.01, 0.05, 1.0, 0.5);
        group.bench_with_input(BenchmarkId::new("chorus", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                chorus.process_block(black_box(&mut left), black_box(&mut right), &ctx);
            })
        });

        let mut chain = preset.build(&config, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("chain", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&input);
                right.copy_from_slice(&input);
                chain.process_block(black_box(&mut left), black_box(&mut right), &ctx);
            })
        });
    }

    group.finish();
}
