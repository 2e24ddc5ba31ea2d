//! Tracking canvas widget.
//!
//! Draws the display buffer's primitives on a braille canvas whose bounds
//! match the hub viewport. Point tracks are a circle with the id below it;
//! area tracks are a full-height band.

use blobhub::display::RenderPrimitive;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Circle, Rectangle},
        Block, Widget,
    },
};

/// Braille cells pack 2×4 dots.
const DOTS_PER_COLUMN: f32 = 2.0;
const DOTS_PER_ROW: f32 = 4.0;

/// Widget drawing one snapshot of the display buffer.
pub struct TrackingView<'a> {
    primitives: &'a [RenderPrimitive],
    width: f32,
    height: f32,
}

impl<'a> TrackingView<'a> {
    /// `width` and `height` are the viewport the primitives were projected into.
    pub fn new(primitives: &'a [RenderPrimitive], width: f32, height: f32) -> Self {
        Self {
            primitives,
            width,
            height,
        }
    }

    fn block() -> Block<'static> {
        Block::bordered().title(" Tracking ")
    }

    /// Size of the drawable canvas in braille dots for `area`.
    pub fn canvas_size(&self, area: Rect) -> (f32, f32) {
        let inner = Self::block().inner(area);
        (
            inner.width as f32 * DOTS_PER_COLUMN,
            inner.height as f32 * DOTS_PER_ROW,
        )
    }
}

impl Widget for TrackingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = f64::from(self.width.max(1.0));
        let height = f64::from(self.height.max(1.0));
        let primitives = self.primitives;

        Canvas::default()
            .block(Self::block())
            .marker(Marker::Braille)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(move |ctx| {
                for primitive in primitives {
                    match primitive {
                        RenderPrimitive::Marker {
                            x,
                            y,
                            radius,
                            label,
                            label_x,
                            label_y,
                        } => {
                            // Canvas y grows upward; display y grows downward.
                            ctx.draw(&Circle {
                                x: f64::from(*x),
                                y: height - f64::from(*y),
                                radius: f64::from(*radius),
                                color: Color::Cyan,
                            });
                            ctx.print(
                                f64::from(*label_x),
                                height - f64::from(*label_y),
                                Span::styled(label.clone(), Style::default().fg(Color::White)),
                            );
                        }
                        RenderPrimitive::Band { x, width: band } => {
                            ctx.draw(&Rectangle {
                                x: f64::from(*x - *band / 2.0),
                                y: 0.0,
                                width: f64::from(*band),
                                height,
                                color: Color::Yellow,
                            });
                        }
                    }
                }
            })
            .render(area, buf);
    }
}
