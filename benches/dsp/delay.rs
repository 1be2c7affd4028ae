//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowsynth::dsp::delay::DelayLine;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Ends of the ping-pong range
    let delay_times: &[f32] = &[0.2, 0.8];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &seconds in delay_times {
            let mut delay = DelayLine::new(2.0, SAMPLE_RATE);
            delay.set_delay(seconds);
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("process_{}ms", (seconds * 1000.0) as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        for sample in buffer.iter_mut() {
                            *sample = delay.process(black_box(*sample));
                        }
                    })
                },
            );
        }

        // Swept fractional read, as the chorus does it
        let mut delay = DelayLine::new(1.0, SAMPLE_RATE);
        for &sample in &input {
            delay.write(sample);
        }
        group.bench_with_input(BenchmarkId::new("read_interpolated", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for i in 0..size {
                    let seconds = 0.03 + (i as f32 * 0.1).sin() * 0.02;
                    sum += delay.read_interpolated(black_box(seconds));
                }
                sum
            })
        });
    }

    group.finish();
}
