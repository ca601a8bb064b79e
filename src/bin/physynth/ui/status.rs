//! Status bar: device, graph size and the last gesture

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use physynth::{bridge::Reaction, graph::NodeId, io::DeviceState};

pub struct Status {
    pub device: DeviceState,
    pub sample_rate: u32,
    pub channels: u16,
    pub frames: u64,
    pub nodes: usize,
    pub links: usize,
    pub pending: Option<NodeId>,
    pub reaction: Reaction,
}

fn describe(reaction: Reaction) -> String {
    match reaction {
        Reaction::None => String::new(),
        Reaction::Selected(id) => format!("grabbed {id}"),
        Reaction::Released { id, snapped } => {
            format!("dropped {id} at ({:.0}, {:.0})", snapped.x, snapped.y)
        }
        Reaction::Armed(id) => format!("patching from {id}"),
        Reaction::Connected { source, target } => format!("{source} → {target}"),
        Reaction::Cancelled(id) => format!("cancelled {id}"),
        Reaction::Ignored(reason) => format!("ignored: {reason:?}"),
        Reaction::Spawned(id) => format!("spawned {id}"),
        Reaction::Removed(id) => format!("removed {id}"),
        Reaction::Disconnected { source, target } => format!("{source} ✕ {target}"),
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, status: &Status) {
    let (symbol, color) = match status.device {
        DeviceState::Running => ("▶ running", Color::Green),
        DeviceState::NotReady => ("… not ready", Color::Yellow),
        DeviceState::Stopped => ("■ stopped", Color::Red),
    };

    let mut spans = vec![
        Span::styled(format!(" {symbol}  "), Style::default().fg(color)),
        Span::styled(
            format!(
                "{:.1}kHz {}ch  {} frames  ",
                status.sample_rate as f32 / 1000.0,
                status.channels,
                status.frames
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{} nodes  {} links  ", status.nodes, status.links),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if let Some(id) = status.pending {
        spans.push(Span::styled(
            format!("armed {id}  "),
            Style::default().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        describe(status.reaction),
        Style::default().fg(Color::Magenta),
    ));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().title(" physynth ").borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
