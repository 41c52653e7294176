//! Benchmarks for complete engine blocks.

use std::hint::black_box;

use aether_dsp::{Engine, EngineConfig, SoundId, TriggerSource, VoiceType};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

const AMBIENT_HITS: [SoundId; 5] = [
    SoundId::Kick,
    SoundId::Snare,
    SoundId::HeavenlyChoir,
    SoundId::Rain,
    SoundId::VinylCrackle,
];

fn running_engine() -> Engine {
    let mut engine = Engine::new(EngineConfig {
        seed: Some(1),
        ..EngineConfig::default()
    });
    engine.initialize().expect("default config is valid");
    engine
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let mut out = vec![0.0f32; size];

        let mut idle = running_engine();
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| idle.process_block(black_box(&mut out)))
        });

        // Eight held pads on the richest voice, retriggered once the
        // auto-release has cleared them
        let mut pads = running_engine();
        pads.set_voice_type(VoiceType::Choir);
        group.bench_with_input(BenchmarkId::new("eight_pads", size), &size, |b, _| {
            b.iter(|| {
                if pads.active_count() == 0 {
                    for step in 0..8 {
                        pads.trigger(TriggerSource::Pad(step), 0.8);
                    }
                }
                pads.process_block(black_box(&mut out));
            })
        });

        // A drum hit layered over long ambient one-shots
        let mut oneshots = running_engine();
        group.bench_with_input(BenchmarkId::new("oneshots", size), &size, |b, _| {
            b.iter(|| {
                if oneshots.oneshot_count() == 0 {
                    for sound in AMBIENT_HITS {
                        oneshots.play(sound, sound.default_velocity());
                    }
                }
                oneshots.process_block(black_box(&mut out));
            })
        });
    }

    group.finish();
}
