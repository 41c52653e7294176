//! Benchmarks for the individual effect units, driven the way the signal
//! graph drives them.

use std::hint::black_box;

use aether_dsp::graph::chorus::ChorusNode;
use aether_dsp::graph::delay::DelayNode;
use aether_dsp::graph::distortion::DistortionNode;
use aether_dsp::graph::reverb::ReverbNode;
use aether_dsp::graph::{GraphNode, RenderCtx};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;

fn bench_unit<N: GraphNode>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    name: &str,
    size: usize,
    input: &[f32],
    mut node: N,
) {
    let mut buffer = input.to_vec();
    let mut time = 0.0;
    group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
        b.iter(|| {
            let ctx = RenderCtx::new(SAMPLE_RATE, time);
            buffer.copy_from_slice(input);
            node.render_block(black_box(&mut buffer), &ctx);
            time = ctx.end_time(size);
        })
    });
}

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/effects");

    for &size in BLOCK_SIZES {
        // Short burst then a quiet tone, so tails stay busy
        let input: Vec<f32> = (0..size)
            .map(|i| if i < 10 { 1.0 - i as f32 / 10.0 } else { (i as f32 * 0.05).sin() * 0.1 })
            .collect();

        let sr = SAMPLE_RATE;
        bench_unit(&mut group, "chorus", size, &input, ChorusNode::new(sr, 0.6));
        bench_unit(&mut group, "delay_120bpm", size, &input, DelayNode::new(sr, 0.3, 120.0));
        bench_unit(&mut group, "delay_40bpm", size, &input, DelayNode::new(sr, 0.3, 40.0));
        bench_unit(&mut group, "reverb_small", size, &input, ReverbNode::new(sr, 0.5, 0.2, 0.45));
        bench_unit(&mut group, "reverb_large", size, &input, ReverbNode::new(sr, 0.5, 1.0, 0.45));
        bench_unit(&mut group, "distortion", size, &input, DistortionNode::new(0.8));
    }

    group.finish();
}
