//! Benchmarks for the level/spectrum analyser.

use std::hint::black_box;

use aether_dsp::dsp::analyser::Analyser;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_analyser(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/analyser");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.2).sin() * 0.5).collect();

        let mut analyser = Analyser::new(256, 0.8).expect("valid analyser");
        group.bench_with_input(BenchmarkId::new("capture", size), &size, |b, _| {
            b.iter(|| analyser.capture(black_box(&input)))
        });

        // Capture plus one spectrum read, as a meter frame does
        let mut analyser = Analyser::new(256, 0.8).expect("valid analyser");
        group.bench_with_input(BenchmarkId::new("capture_spectrum", size), &size, |b, _| {
            b.iter(|| {
                analyser.capture(black_box(&input));
                black_box(analyser.frequency_data()[0])
            })
        });
    }

    group.finish();
}
