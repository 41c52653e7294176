//! Aether - audio setup and the realtime callback

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use rtrb::RingBuffer;
use tracing::{error, info};

use aether_dsp::{Engine, EngineCommand, EngineConfig, MAX_BLOCK_SIZE};

use super::ui::{MeterFrame, UiApp, METER_BINS};

/// Commands buffered between two UI frames. Key mashing stays well below.
const COMMAND_CAPACITY: usize = 256;
const METER_CAPACITY: usize = 8;
/// Meter frames per second sent back to the UI.
const METER_RATE: f32 = 60.0;

/// Main application builder
pub struct Aether {
    bpm: f32,
    config: EngineConfig,
}

impl Aether {
    pub fn new() -> Self {
        Self {
            bpm: 120.0,
            config: EngineConfig::default(),
        }
    }

    /// Set the starting tempo
    pub fn bpm(mut self, bpm: f32) -> Self {
        self.bpm = bpm;
        self
    }

    /// Open the default output, start the engine, hand the terminal to the UI.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        info!(sample_rate, channels, "output device opened");

        let mut engine = Engine::new(EngineConfig {
            sample_rate,
            ..self.config
        });
        engine.set_tempo(self.bpm);
        engine
            .initialize()
            .wrap_err("audio engine failed to start")?;

        let (command_tx, mut command_rx) = RingBuffer::<EngineCommand>::new(COMMAND_CAPACITY);
        let (mut meter_tx, meter_rx) = RingBuffer::<MeterFrame>::new(METER_CAPACITY);

        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let meter_interval = (sample_rate / METER_RATE) as usize;
        let mut since_meter = 0usize;

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                engine.drain(&mut command_rx);

                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let block = &mut render_buf[..frames_to_render];
                    engine.process_block(block);

                    // Mono to every channel
                    let out_off = frames_written * channels;
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[out_off + i * channels + ch] = s;
                        }
                    }

                    frames_written += frames_to_render;
                }

                since_meter += total_frames;
                if since_meter >= meter_interval {
                    since_meter = 0;
                    let mut frame = MeterFrame {
                        level: engine.level(),
                        active_voices: engine.active_count() as u16,
                        oneshots: engine.oneshot_count() as u16,
                        now: engine.now(),
                        ..MeterFrame::default()
                    };
                    for (dst, src) in frame.bins.iter_mut().zip(engine.spectrum()) {
                        *dst = *src;
                    }
                    // A full queue means the UI is behind; drop the frame.
                    let _ = meter_tx.push(frame);
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;
        info!(bins = METER_BINS, "stream started");

        let mut terminal = ratatui::init();
        let result = UiApp::new(command_tx, meter_rx, self.bpm).run(&mut terminal);
        ratatui::restore();
        result
    }
}

impl Default for Aether {
    fn default() -> Self {
        Self::new()
    }
}
