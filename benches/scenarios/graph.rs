//! Benchmarks for the fixed effect chain.

use std::hint::black_box;

use aether_dsp::engine::ParameterSet;
use aether_dsp::graph::{Bus, BusBuffers, RenderCtx, SignalGraph};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/graph");
    let sample_rate = 48_000.0;
    let settings = ParameterSet::default().effect_settings();

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size).map(|i| (i as f32 * 0.03).sin() * 0.3).collect();
        let mut out = vec![0.0f32; size];

        // Only the melodic bus carries signal
        let mut graph = SignalGraph::new(sample_rate, 256, 0.8, &settings).expect("valid graph");
        let mut buses = BusBuffers::new(size);
        buses.clear(size);
        buses.add(Bus::Filter, &signal);
        let mut time = 0.0;
        group.bench_with_input(BenchmarkId::new("filter_bus", size), &size, |b, _| {
            b.iter(|| {
                let ctx = RenderCtx::new(sample_rate, time);
                graph.render(black_box(&buses), &mut out, &ctx);
                time = ctx.end_time(size);
            })
        });

        // Every bus carries signal
        let mut graph = SignalGraph::new(sample_rate, 256, 0.8, &settings).expect("valid graph");
        let mut buses = BusBuffers::new(size);
        buses.clear(size);
        for bus in Bus::ALL {
            buses.add(bus, &signal);
        }
        let mut time = 0.0;
        group.bench_with_input(BenchmarkId::new("all_buses", size), &size, |b, _| {
            b.iter(|| {
                let ctx = RenderCtx::new(sample_rate, time);
                graph.render(black_box(&buses), &mut out, &ctx);
                time = ctx.end_time(size);
            })
        });
    }

    group.finish();
}
