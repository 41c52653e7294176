//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use aether_dsp::dsp::filter::SVFilter;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn ramp(size: usize) -> Vec<f32> {
    (0..size).map(|i| (i as f32 / size as f32) * 2.0 - 1.0).collect()
}

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input = ramp(size);
        let mut buffer = input.clone();

        // Fixed cutoff: coefficients computed once per block
        for (name, mut filter) in [
            ("lowpass", SVFilter::lowpass(1_000.0)),
            ("highpass", SVFilter::highpass(1_000.0)),
            ("bandpass_q4", SVFilter::bandpass(1_000.0, 4.0)),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer), SAMPLE_RATE);
                })
            });
        }

        // Automated cutoff: coefficients recomputed every sample, the cost
        // paid by sweeping one-shot layers
        let mut filter = SVFilter::lowpass(200.0);
        let cutoffs: Vec<f32> = (0..size).map(|i| 200.0 + i as f32 * 30.0).collect();
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                for ((out, &x), &cutoff) in buffer.iter_mut().zip(&input).zip(&cutoffs) {
                    *out = filter.process_at(x, black_box(cutoff), SAMPLE_RATE);
                }
            })
        });
    }

    group.finish();
}
