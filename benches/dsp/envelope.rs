//! Benchmarks for the attack/decay envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowsynth::dsp::envelope::Envelope;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut envelope = Envelope::new(SAMPLE_RATE);

        group.bench_with_input(BenchmarkId::new("render", size), &size, |b, _| {
            b.iter(|| {
                if !envelope.is_active() {
                    envelope.trigger();
                }
                envelope.render(black_box(&mut buffer));
            })
        });

        // Disabled voices only move the clock
        group.bench_with_input(BenchmarkId::new("advance", size), &size, |b, _| {
            b.iter(|| {
                if !envelope.is_active() {
                    envelope.trigger();
                }
                envelope.advance(black_box(size as u32));
            })
        });
    }

    group.finish();
}
