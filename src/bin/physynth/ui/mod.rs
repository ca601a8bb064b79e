//! Terminal front-end: the field, a scope, a spectrum and a status bar.

pub mod field;
pub mod spectrum;
pub mod status;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use physynth::{physics::Bounds, session::Scene};

use field::render_field;
use spectrum::render_spectrum;
use status::{render_status, Status};
use waveform::render_waveform;

const HELP: &str = " [o] osc  [l] lfo  [p] out  [x] remove  [d] disconnect  \
                    left: drag  right: patch  [q] quit";

/// Draw one frame. Returns the area the field occupies so mouse input can be
/// mapped back to world coordinates.
pub fn render(
    frame: &mut Frame,
    scene: &Scene,
    bounds: Bounds,
    scope: &[f32],
    spectrum: &[(f64, f64)],
    status: &Status,
) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status
            Constraint::Min(10),   // Field
            Constraint::Length(9), // Scope + spectrum
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let scopes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    render_status(frame, rows[0], status);
    let field = render_field(frame, rows[1], scene, bounds);
    render_waveform(frame, scopes[0], scope);
    render_spectrum(frame, scopes[1], spectrum);

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[3]);

    field
}
