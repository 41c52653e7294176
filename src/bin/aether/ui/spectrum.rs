//! Spectrum bars and level meter, fed by the engine's analyser

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge},
    Frame,
};

/// Bar height resolution.
const BAR_SCALE: f32 = 100.0;

/// Average adjacent analyser bins down to `bars` columns.
fn group_bins(bins: &[f32], bars: usize) -> Vec<u64> {
    if bars == 0 || bins.is_empty() {
        return Vec::new();
    }
    let per_bar = (bins.len() / bars).max(1);
    bins.chunks(per_bar)
        .take(bars)
        .map(|chunk| {
            let mean = chunk.iter().sum::<f32>() / chunk.len() as f32;
            (mean.clamp(0.0, 1.0) * BAR_SCALE) as u64
        })
        .collect()
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, bins: &[f32]) {
    let block = Block::default().title(" Spectrum ").borders(Borders::ALL);
    let columns = block.inner(area).width as usize;

    let bars: Vec<Bar> = group_bins(bins, columns)
        .into_iter()
        .map(|value| {
            let color = match value {
                0..=40 => Color::Blue,
                41..=70 => Color::Cyan,
                _ => Color::Magenta,
            };
            Bar::default()
                .value(value)
                .text_value(String::new())
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(1)
        .bar_gap(0)
        .max(BAR_SCALE as u64)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

pub fn render_level(frame: &mut Frame, area: Rect, level: f32) {
    let gauge = Gauge::default()
        .block(Block::default().title(" Level ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(level.clamp(0.0, 1.0) as f64);

    frame.render_widget(gauge, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_bins_averages() {
        let bins = [0.0, 1.0, 0.5, 0.5];
        assert_eq!(group_bins(&bins, 2), vec![50, 50]);
        assert_eq!(group_bins(&bins, 8).len(), 4);
        assert!(group_bins(&bins, 0).is_empty());
    }
}
