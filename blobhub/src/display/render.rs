//! Rendering classification policy.
//!
//! Point-like items are drawn as a marker with their identity label just
//! below. Area-like items span the full sensed height, so they are drawn as a
//! vertical band at their horizontal position and their vertical coordinate is
//! ignored.

use super::buffer::DisplayItem;
use crate::track::TrackClass;

/// Radius of a point marker in pixels.
pub const MARKER_RADIUS: f32 = 15.0;

/// Vertical distance from a marker to its identity label in pixels.
pub const LABEL_OFFSET: f32 = 30.0;

/// Width of an area band in pixels.
pub const BAND_WIDTH: f32 = 4.0;

/// A drawing instruction derived from one display item.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPrimitive {
    /// Marker plus identity label near the position.
    Marker {
        x: f32,
        y: f32,
        radius: f32,
        label: String,
        label_x: f32,
        label_y: f32,
    },
    /// Full-height band at a horizontal position.
    Band { x: f32, width: f32 },
}

impl RenderPrimitive {
    /// Derive the primitive for a display item.
    pub fn for_item(item: &DisplayItem) -> Self {
        match item.class {
            TrackClass::Point => RenderPrimitive::Marker {
                x: item.x,
                y: item.y,
                radius: MARKER_RADIUS,
                label: item.id.to_string(),
                label_x: item.x,
                label_y: item.y + LABEL_OFFSET,
            },
            TrackClass::Area => RenderPrimitive::Band {
                x: item.x,
                width: BAND_WIDTH,
            },
        }
    }

    /// Horizontal position of the primitive.
    pub fn x(&self) -> f32 {
        match self {
            RenderPrimitive::Marker { x, .. } | RenderPrimitive::Band { x, .. } => *x,
        }
    }
}
