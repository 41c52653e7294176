//! TUI module for aether
//!
//! Turns key presses into engine commands and draws the meter frames the
//! audio callback sends back.

mod pads;
mod spectrum;
mod state;
mod transport;

use std::io::stdout;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{execute, terminal::supports_keyboard_enhancement};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::{Consumer, Producer};
use tracing::{debug, warn};

use aether_dsp::sequencing::{RowMap, ScaleMode, StepClock, StepPattern};
use aether_dsp::{Category, EngineCommand, SoundId, TriggerSource, VoiceType};

pub use state::{MeterFrame, METER_BINS};

use pads::{render_grid, render_pads};
use spectrum::{render_level, render_spectrum};
use transport::{render_transport, TransportInfo};

/// Keys playing scale steps 0..7 as keyboard notes.
const SCALE_KEYS: [char; 7] = ['z', 'x', 'c', 'v', 'b', 'n', 'm'];
const KEY_VELOCITY: f32 = 0.7;
const STEP_VELOCITY: f32 = 0.9;
const TEMPO_STEP: f32 = 5.0;

/// UI application state
pub struct UiApp {
    /// Commands to the audio thread
    command_tx: Producer<EngineCommand>,
    /// Meter frames from the audio thread
    meter_rx: Consumer<MeterFrame>,
    /// Latest meter frame received
    meter: MeterFrame,
    category: Category,
    voice_type: VoiceType,
    scale_mode: ScaleMode,
    last_sound: Option<SoundId>,
    pattern: StepPattern,
    rows: RowMap,
    clock: StepClock,
    last_tick: Instant,
    /// Whether the terminal reports key releases
    tracked_keys: bool,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        command_tx: Producer<EngineCommand>,
        meter_rx: Consumer<MeterFrame>,
        bpm: f32,
    ) -> Self {
        Self {
            command_tx,
            meter_rx,
            meter: MeterFrame::default(),
            category: Category::Drums,
            voice_type: VoiceType::default(),
            scale_mode: ScaleMode::default(),
            last_sound: None,
            pattern: starter_pattern(),
            rows: RowMap::default(),
            clock: StepClock::new(bpm),
            last_tick: Instant::now(),
            tracked_keys: false,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        self.tracked_keys = matches!(supports_keyboard_enhancement(), Ok(true));
        if self.tracked_keys {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        debug!(tracked_keys = self.tracked_keys, "ui started");

        let result = self.event_loop(terminal);

        if self.tracked_keys {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_meter();
            self.tick_sequencer();

            terminal.draw(|frame| self.render(frame))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        self.send(EngineCommand::Panic);
        Ok(())
    }

    /// Keep only the latest meter frame
    fn poll_meter(&mut self) {
        while let Ok(frame) = self.meter_rx.pop() {
            self.meter = frame;
        }
    }

    fn tick_sequencer(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;

        for step in self.clock.advance(dt) {
            let rows: Vec<usize> = self.pattern.rows_at(step).collect();
            for row in rows {
                self.send(EngineCommand::SequencerStep {
                    row,
                    velocity: STEP_VELOCITY,
                });
            }
        }
    }

    fn send(&mut self, command: EngineCommand) {
        if self.command_tx.push(command).is_err() {
            warn!(?command, "command queue full, dropped");
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if let KeyCode::Char(c) = key.code {
            if let Some(step) = SCALE_KEYS.iter().position(|k| *k == c) {
                self.handle_scale_key(c, step, key.kind);
                return;
            }
        }
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Esc => self.send(EngineCommand::Panic),
            KeyCode::Tab => self.category = self.category.next(),
            KeyCode::Char(c @ '1'..='8') => {
                let index = c as usize - '1' as usize;
                if let Some(&sound) = self.category.sounds().get(index) {
                    self.last_sound = Some(sound);
                    self.send(EngineCommand::Play {
                        sound,
                        velocity: sound.default_velocity(),
                    });
                }
            }
            KeyCode::Char(' ') => {
                if self.clock.is_running() {
                    self.clock.stop();
                } else {
                    self.clock.start();
                }
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                self.voice_type = cycle(&VoiceType::ALL, self.voice_type, forward);
                self.send(EngineCommand::SetVoiceType(self.voice_type));
            }
            KeyCode::Up | KeyCode::Down => {
                let forward = key.code == KeyCode::Up;
                self.scale_mode = cycle(&ScaleMode::ALL, self.scale_mode, forward);
                self.send(EngineCommand::SetScaleMode(self.scale_mode));
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge_tempo(TEMPO_STEP),
            KeyCode::Char('-') => self.nudge_tempo(-TEMPO_STEP),
            KeyCode::Char('r') => self.pattern.randomize(&mut rand::thread_rng()),
            KeyCode::Char('e') => self.pattern.clear(),
            _ => {}
        }
    }

    /// Scale keys hold a voice while down when the terminal reports
    /// releases; otherwise each press is a tap left to the auto-release.
    fn handle_scale_key(&mut self, key: char, step: usize, kind: KeyEventKind) {
        let source = TriggerSource::Midi(self.scale_mode.midi_note(step));
        match (self.tracked_keys, kind) {
            (true, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.send(EngineCommand::KeyDown {
                    key,
                    source,
                    velocity: KEY_VELOCITY,
                });
            }
            (true, KeyEventKind::Release) => self.send(EngineCommand::KeyUp { key }),
            (false, KeyEventKind::Press) => self.send(EngineCommand::Trigger {
                source,
                velocity: KEY_VELOCITY,
            }),
            _ => {}
        }
    }

    fn nudge_tempo(&mut self, delta: f32) {
        self.clock.set_bpm(self.clock.bpm() + delta);
        self.send(EngineCommand::SetTempo(self.clock.bpm()));
    }

    /// Render the UI
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Transport
                Constraint::Length(6),  // Pads
                Constraint::Min(8),     // Spectrum + level
                Constraint::Length(10), // Sequencer
                Constraint::Length(1),  // Help
            ])
            .split(area);

        let info = TransportInfo {
            voice_type: self.voice_type,
            scale_mode: self.scale_mode,
            bpm: self.clock.bpm(),
            sequencer_running: self.clock.is_running(),
            tracked_keys: self.tracked_keys,
        };
        render_transport(frame, chunks[0], &info, &self.meter);
        render_pads(frame, chunks[1], self.category, self.last_sound);

        let meters = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(14)])
            .split(chunks[2]);
        render_spectrum(frame, meters[0], &self.meter.bins);
        render_level(frame, meters[1], self.meter.level);

        let playhead = self.clock.is_running().then(|| {
            (self.clock.current_step() + STEPS_PER_BAR - 1) % STEPS_PER_BAR
        });
        render_grid(frame, chunks[3], &self.pattern, &self.rows, playhead);

        let help = Paragraph::new(
            " [1-8] Pads  [Z-M] Notes  [←→] Voice  [↑↓] Mode  [+/-] Tempo  [R] Random  [E] Clear  [Esc] Panic  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[4]);
    }
}

const STEPS_PER_BAR: usize = aether_dsp::sequencing::pattern::STEPS;

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let index = all.iter().position(|v| *v == current).unwrap_or(0);
    let len = all.len();
    let next = if forward { index + 1 } else { index + len - 1 };
    all[next % len]
}

/// Four on the floor with a backbeat and offbeat hats.
fn starter_pattern() -> StepPattern {
    let mut pattern = StepPattern::new();
    for step in (0..STEPS_PER_BAR).step_by(4) {
        pattern.set(0, step, true);
    }
    pattern.set(1, 4, true);
    pattern.set(1, 12, true);
    for step in (2..STEPS_PER_BAR).step_by(4) {
        pattern.set(2, step, true);
    }
    pattern
}
