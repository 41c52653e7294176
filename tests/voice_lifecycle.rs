use aether_dsp::{Engine, EngineConfig, Param, TriggerSource, VoiceState};

const SAMPLE_RATE: f32 = 48_000.0;

fn engine(cancel_and_hold: bool) -> Engine {
    let mut engine = Engine::new(EngineConfig {
        cancel_and_hold,
        seed: Some(3),
        ..EngineConfig::with_sample_rate(SAMPLE_RATE)
    });
    engine.initialize().unwrap();
    engine
}

fn both_modes(check: impl Fn(Engine)) {
    for cancel_and_hold in [true, false] {
        check(engine(cancel_and_hold));
    }
}

#[test]
fn parameters_are_clamped_never_rejected() {
    let mut engine = Engine::new(EngineConfig::default());
    for param in Param::ALL {
        for (input, expected) in [(-3.0, 0.0), (7.5, 1.0), (f32::NAN, 0.0), (0.25, 0.25)] {
            assert_eq!(engine.set_parameter(param, input), expected, "{}", param.name());
            assert_eq!(engine.params().get(param), expected);
        }
    }

    // Same again on a running graph
    engine.initialize().unwrap();
    assert_eq!(engine.set_parameter(Param::Filter, 2.0), 1.0);
    let cutoff = engine.graph().unwrap().filter_cutoff_hz();
    assert!((cutoff - 18_200.0).abs() < 1.0);
    assert_eq!(engine.set_parameter(Param::Filter, -1.0), 0.0);
    let cutoff = engine.graph().unwrap().filter_cutoff_hz();
    assert!((cutoff - 200.0).abs() < 1.0);
}

#[test]
fn released_voices_return_to_baseline() {
    both_modes(|mut engine| {
        let baseline = engine.sounding_count();
        let handles: Vec<_> = (0..4)
            .filter_map(|step| engine.trigger(TriggerSource::Pad(step), 0.8))
            .collect();
        assert_eq!(handles.len(), 4);
        assert_eq!(engine.active_count(), 4);
        assert_eq!(engine.pending_tasks(), 4);

        engine.advance(0.5);
        for handle in &handles {
            engine.release(*handle, Some(0.1));
        }
        assert_eq!(engine.active_count(), 0);
        assert_eq!(engine.pending_tasks(), 8);
        assert!(handles
            .iter()
            .all(|h| engine.voice_state(*h) == VoiceState::Releasing));

        // release time plus teardown grace plus a little slack
        engine.advance(0.1 + 0.12 + 0.05);
        assert_eq!(engine.sounding_count(), baseline);
        assert!(handles
            .iter()
            .all(|h| engine.voice_state(*h) == VoiceState::Terminated));
    });
}

#[test]
fn panic_silences_any_number_of_voices() {
    for voices in [0, 1, 5, 16] {
        both_modes(|mut engine| {
            for step in 0..voices {
                engine.trigger(TriggerSource::Pad(step), 0.9);
            }
            engine.key_down('z', TriggerSource::Midi(60), 0.7);
            engine.advance(0.3);

            engine.panic();
            assert_eq!(engine.active_count(), 0);

            engine.advance(0.02 + 0.12 + 0.05);
            assert_eq!(engine.sounding_count(), 0, "{voices} voices");
        });
    }
}

#[test]
fn second_release_is_a_no_op() {
    both_modes(|mut engine| {
        let handle = engine.trigger(TriggerSource::Pad(2), 0.8).unwrap();
        engine.advance(0.4);

        engine.release(handle, Some(0.3));
        engine.advance(0.01);
        let voice = engine.voice(handle).unwrap();
        let events = voice.gain().events().to_vec();
        let end = voice.release_end();

        engine.release(handle, Some(0.05));
        engine.release(handle, None);
        let voice = engine.voice(handle).unwrap();
        assert_eq!(voice.gain().events(), &events[..]);
        assert_eq!(voice.release_end(), end);
    });
}

#[test]
fn immediate_release_ramps_from_the_current_value() {
    both_modes(|mut engine| {
        let handle = engine.trigger(TriggerSource::Pad(0), 1.0).unwrap();
        // Half a millisecond into the attack
        engine.advance(0.0005);
        let now = engine.now();
        let before = engine.voice(handle).unwrap().gain().value_at(now);
        assert!(before < 1.0);

        engine.release(handle, None);
        let voice = engine.voice(handle).unwrap();
        let gain = voice.gain();
        let end = voice.release_end().unwrap();

        assert!((gain.value_at(now) - before).abs() < 1e-3);
        let steps = 100;
        for i in 0..=steps {
            let t = now + (end - now) * i as f64 / steps as f64;
            assert!(gain.value_at(t) <= before + 1e-3, "jump at {t}");
        }
        assert_eq!(gain.value_at(end), 0.0);
    });
}

#[test]
fn release_holds_mid_decay_value() {
    both_modes(|mut engine| {
        let handle = engine.trigger(TriggerSource::Pad(0), 0.9).unwrap();
        let envelope = engine.voice(handle).unwrap().envelope();
        // Middle of the decay ramp
        engine.advance((envelope.attack + envelope.decay * 0.5) as f64);
        assert_eq!(engine.voice_state(handle), VoiceState::Decaying);

        let now = engine.now();
        let before = engine.voice(handle).unwrap().gain().value_at(now);
        engine.release(handle, Some(0.2));
        let after = engine.voice(handle).unwrap().gain().value_at(now);
        assert!((after - before).abs() < 1e-3);
        assert!(after > 0.9 * envelope.sustain);
    });
}

#[test]
fn twenty_unreleased_voices_are_gone_after_the_timeout() {
    both_modes(|mut engine| {
        for i in 0..20 {
            engine.trigger(TriggerSource::Pad(i % 16), 0.7);
        }
        assert_eq!(engine.active_count(), 20);

        engine.advance(2.9);
        assert_eq!(engine.active_count(), 20);

        engine.advance(0.2);
        assert_eq!(engine.active_count(), 0);
        assert!(engine.active_handles().is_empty());

        // The longest default release is 1.8s
        engine.advance(2.0);
        assert_eq!(engine.sounding_count(), 0);
    });
}

#[test]
fn nothing_plays_while_suspended() {
    let mut engine = engine(true);
    let handle = engine.trigger(TriggerSource::Pad(0), 0.8).unwrap();
    engine.suspend();
    assert_eq!(engine.trigger(TriggerSource::Pad(1), 0.8), None);

    // Release and panic still land on a suspended context
    engine.release(handle, Some(0.05));
    assert_eq!(engine.active_count(), 0);

    let mut out = vec![1.0; 512];
    engine.process_block(&mut out);
    assert!(out.iter().all(|s| *s == 0.0));

    engine.resume();
    engine.advance(0.05 + 0.12 + 0.05);
    assert_eq!(engine.sounding_count(), 0);
}
