//! Benchmarks for the compressor and limiter.

use std::hint::black_box;

use aether_dsp::dsp::dynamics::{Compressor, DynamicsSettings};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_dynamics(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/dynamics");
    let sample_rate = 48_000.0;

    for &size in BLOCK_SIZES {
        // Loud enough to sit above both thresholds
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin() * 0.9).collect();

        for (name, settings) in [
            ("compressor", DynamicsSettings::BUS_COMPRESSOR),
            ("limiter", DynamicsSettings::SAFETY_LIMITER),
        ] {
            let mut dynamics = Compressor::new(settings, sample_rate);
            let mut buffer = input.clone();
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    dynamics.render(black_box(&mut buffer));
                })
            });
        }
    }

    group.finish();
}
