//! Sound pads for the current category and the step sequencer grid

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use aether_dsp::sequencing::{
    pattern::{ROWS, STEPS},
    RowMap, StepPattern,
};
use aether_dsp::{Category, SoundId};

pub fn render_pads(frame: &mut Frame, area: Rect, category: Category, last: Option<SoundId>) {
    let block = Block::default()
        .title(format!(" {} [Tab] ", category.name()))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sounds = category.sounds();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, 8); 8])
        .split(inner);

    for (i, cell) in cells.iter().enumerate() {
        let Some(&sound) = sounds.get(i) else {
            continue;
        };
        let style = if last == Some(sound) {
            Style::default().fg(Color::Black).bg(Color::Magenta)
        } else {
            Style::default().fg(Color::White)
        };
        let pad = Paragraph::new(vec![
            Line::from(Span::styled(sound.label(), style.add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(format!("{}", i + 1), Style::default().fg(Color::DarkGray))),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(pad, *cell);
    }
}

pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    pattern: &StepPattern,
    rows: &RowMap,
    playhead: Option<usize>,
) {
    let block = Block::default()
        .title(" Sequencer [Space] ")
        .borders(Borders::ALL);

    let lines: Vec<Line> = (0..ROWS)
        .map(|row| {
            let label = rows.sound(row).map_or("", SoundId::label);
            let mut spans = vec![Span::styled(
                format!(" {:<7}", label),
                Style::default().fg(Color::Cyan),
            )];
            for step in 0..STEPS {
                let on = pattern.is_on(row, step);
                let color = if on { Color::Magenta } else { Color::DarkGray };
                let mut style = Style::default().fg(color);
                if playhead == Some(step) {
                    style = style.bg(Color::Rgb(40, 40, 60));
                }
                let cell = if on { "■ " } else { "· " };
                spans.push(Span::styled(cell, style));
                if step % 4 == 3 {
                    spans.push(Span::raw(" "));
                }
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
