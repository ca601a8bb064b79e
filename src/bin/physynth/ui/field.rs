//! The physics field drawn on a braille canvas.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Line},
        Block, Borders,
    },
    Frame,
};

use physynth::{
    graph::NodeKind,
    math::Vec2,
    physics::Bounds,
    session::{BodyView, Scene},
};

/// Screen radius of a body, in world units.
const BODY_RADIUS: f64 = 20.0;

fn kind_color(kind: NodeKind) -> Color {
    match kind {
        NodeKind::Oscillator => Color::Cyan,
        NodeKind::Lfo => Color::Magenta,
        NodeKind::Output => Color::Green,
    }
}

fn body_color(body: &BodyView) -> Color {
    if body.pending {
        Color::Yellow
    } else if body.selected {
        Color::White
    } else {
        kind_color(body.kind)
    }
}

/// World y grows downward, canvas y grows upward.
fn flip(bounds: Bounds, point: Vec2) -> (f64, f64) {
    (point.x as f64, (bounds.max.y - (point.y - bounds.min.y)) as f64)
}

/// Render the field and return its inner area.
pub fn render_field(frame: &mut Frame, area: Rect, scene: &Scene, bounds: Bounds) -> Rect {
    let block = Block::default().title(" Field ").borders(Borders::ALL);
    let inner = block.inner(area);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([bounds.min.x as f64, bounds.max.x as f64])
        .y_bounds([bounds.min.y as f64, bounds.max.y as f64])
        .paint(|ctx| {
            for link in &scene.links {
                let (x1, y1) = flip(bounds, link.from_pos);
                let (x2, y2) = flip(bounds, link.to_pos);
                ctx.draw(&Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: Color::DarkGray,
                });
            }
            ctx.layer();

            for body in &scene.bodies {
                let (x, y) = flip(bounds, body.position);
                ctx.draw(&Circle {
                    x,
                    y,
                    radius: BODY_RADIUS,
                    color: body_color(body),
                });
                ctx.print(
                    x,
                    y,
                    Span::styled(body.kind.label(), Style::default().fg(body_color(body))),
                );
            }
        });

    frame.render_widget(canvas, area);
    inner
}

/// World point under terminal cell (`column`, `row`), taking the cell center.
pub fn cell_to_world(area: Rect, bounds: Bounds, column: u16, row: u16) -> Option<Vec2> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let right = area.x.saturating_add(area.width);
    let bottom = area.y.saturating_add(area.height);
    if !(area.x..right).contains(&column) || !(area.y..bottom).contains(&row) {
        return None;
    }
    let tx = (column - area.x) as f32 + 0.5;
    let ty = (row - area.y) as f32 + 0.5;
    Some(Vec2::new(
        bounds.min.x + tx / area.width as f32 * bounds.width(),
        bounds.min.y + ty / area.height as f32 * bounds.height(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<Vec2>, b: Vec2) -> bool {
        a.is_some_and(|a| a.distance(b) < 1e-3)
    }

    #[test]
    fn cells_map_to_cell_centers() {
        let area = Rect::new(1, 1, 80, 30);
        let bounds = Bounds::new(800.0, 600.0);

        assert!(close(cell_to_world(area, bounds, 1, 1), Vec2::new(5.0, 10.0)));
        assert!(close(cell_to_world(area, bounds, 80, 30), Vec2::new(795.0, 590.0)));
        assert_eq!(cell_to_world(area, bounds, 0, 5), None);
        assert_eq!(cell_to_world(area, bounds, 81, 5), None);
        assert_eq!(cell_to_world(Rect::default(), bounds, 0, 0), None);
    }

    #[test]
    fn flip_inverts_vertical_axis() {
        let bounds = Bounds::new(800.0, 600.0);
        assert_eq!(flip(bounds, Vec2::new(10.0, 0.0)), (10.0, 600.0));
        assert_eq!(flip(bounds, Vec2::new(10.0, 600.0)), (10.0, 0.0));
    }
}
