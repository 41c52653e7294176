//! Status bar widget - voice, mode, tempo, sequencer state and engine stats

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use aether_dsp::{sequencing::ScaleMode, VoiceType};

use super::MeterFrame;

pub struct TransportInfo {
    pub voice_type: VoiceType,
    pub scale_mode: ScaleMode,
    pub bpm: f32,
    pub sequencer_running: bool,
    pub tracked_keys: bool,
}

pub fn render_transport(frame: &mut Frame, area: Rect, info: &TransportInfo, meter: &MeterFrame) {
    let block = Block::default()
        .title(Span::styled(
            " ÆTHER-1 ",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL);

    let play_symbol = if info.sequencer_running { "▶" } else { "⏸" };
    let keys = if info.tracked_keys { "held keys" } else { "tap keys" };

    let line = Line::from(vec![
        Span::styled(
            format!(" voice: {:<7}", info.voice_type.name()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("mode: {:<7}", info.scale_mode.name()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("{} {:.0} BPM  ", play_symbol, info.bpm),
            Style::default().fg(if info.sequencer_running {
                Color::Green
            } else {
                Color::Yellow
            }),
        ),
        Span::styled(
            format!("voices: {:<3} one-shots: {:<3}", meter.active_voices, meter.oneshots),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(
            format!("  {:.1}s  {}", meter.now, keys),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
