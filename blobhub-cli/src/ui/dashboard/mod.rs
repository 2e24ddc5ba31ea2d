//! Main TUI dashboard.
//!
//! ```text
//! ┌ Tracking ─────────────────────────────────────────────┐
//! │        ○           │                                   │
//! │        7           │              ○                    │
//! │                    │              12                   │
//! └────────────────────────────────────────────────────────┘
//! ┌ Status ────────────────────────────────────────────────┐
//! │ BROADCAST   : YES   ...                                │
//! └────────────────────────────────────────────────────────┘
//! ```

mod utils;

pub use utils::{format_duration, print_session_summary, print_simple_status};

use blobhub::display::DisplayBuffer;
use blobhub::hub::HubStatus;
use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;

use super::widgets::{StatusWidget, TrackingView};

/// Height of the status panel including borders.
const STATUS_HEIGHT: u16 = 9;

/// Screen layout state carried across frames.
#[derive(Debug, Default)]
pub struct Dashboard {
    canvas_size: Option<(f32, f32)>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one frame.
    ///
    /// Returns the new tracking canvas size in dots when it changed since the
    /// previous frame, so the caller can resize the hub viewport.
    pub fn render(
        &mut self,
        frame: &mut Frame,
        display: &DisplayBuffer,
        status: &HubStatus,
    ) -> Option<(f32, f32)> {
        let [tracking_area, status_area] =
            Layout::vertical([Constraint::Min(4), Constraint::Length(STATUS_HEIGHT)])
                .areas(frame.area());

        let viewport = display.viewport();
        let (primitives, items) = display.with_snapshot(|snapshot| {
            (snapshot.primitives().collect::<Vec<_>>(), snapshot.len())
        });

        let view = TrackingView::new(&primitives, viewport.width, viewport.height);
        let canvas_size = view.canvas_size(tracking_area);
        frame.render_widget(view, tracking_area);
        frame.render_widget(StatusWidget::new(status, items), status_area);

        if self.canvas_size != Some(canvas_size) {
            self.canvas_size = Some(canvas_size);
            return Some(canvas_size);
        }
        None
    }
}
