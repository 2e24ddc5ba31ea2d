//! Status panel widget.

use blobhub::hub::HubStatus;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::ui::dashboard::format_duration;

/// Feature flags, source count and dispatch counters.
pub struct StatusWidget<'a> {
    status: &'a HubStatus,
    items: usize,
}

impl<'a> StatusWidget<'a> {
    pub fn new(status: &'a HubStatus, items: usize) -> Self {
        Self { status, items }
    }

    fn flag_line(label: &str, enabled: bool) -> Line<'static> {
        let (text, color) = if enabled {
            ("YES", Color::Green)
        } else {
            ("NO", Color::DarkGray)
        };
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::DarkGray)),
            Span::styled(text, Style::default().fg(color)),
        ])
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let status = self.status;
        let metrics = &status.metrics;

        let lines = vec![
            Self::flag_line("BROADCAST   ", status.broadcast_enabled),
            Self::flag_line("SENDER      ", status.telemetry_enabled),
            Self::flag_line("RECEIVER    ", status.receiver_enabled),
            Self::flag_line("PERSTRACKING", status.person_tracking),
            Line::from(format!("Registered Sources: {}", status.source_count)),
            Line::from(vec![
                Span::styled(
                    format!(
                        "Batches: {} ({:.1}/s)  Rejected: {}  Tracks: {}  Up: {}",
                        metrics.batches_received,
                        metrics.batches_per_second(),
                        metrics.batches_rejected,
                        self.items,
                        format_duration(metrics.uptime),
                    ),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled("   q to quit", Style::default().fg(Color::DarkGray)),
            ]),
        ];

        Paragraph::new(lines)
            .block(Block::bordered().title(" Status "))
            .render(area, buf);
    }
}
