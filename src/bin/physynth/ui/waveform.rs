//! Scope trace of the engine output

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Samples shown per trace.
const WINDOW: usize = 512;

/// First rising zero crossing, so a steady tone draws in place.
fn trigger(samples: &[f32]) -> usize {
    let search = samples.len().saturating_sub(WINDOW);
    samples[..search.min(samples.len())]
        .windows(2)
        .position(|pair| pair[0] <= 0.0 && pair[1] > 0.0)
        .map_or(search, |index| index + 1)
}

pub fn render_waveform(frame: &mut Frame, area: Rect, scope: &[f32]) {
    let block = Block::default().title(" Scope ").borders(Borders::ALL);

    let start = trigger(scope);
    let visible = &scope[start..(start + WINDOW).min(scope.len())];
    let data: Vec<(f64, f64)> = visible
        .iter()
        .enumerate()
        .map(|(i, &sample)| (i as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, WINDOW as f64])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
