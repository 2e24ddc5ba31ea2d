//! Display buffer consumed by the render loop.
//!
//! The [`DisplayBuffer`] holds the latest projection of a
//! [`TrackRecordSet`](crate::track::TrackRecordSet) into render-target pixel
//! coordinates. Producers publish into it from their own threads; the render
//! loop reads it once per frame from another thread.
//!
//! # State Machine
//!
//! ```text
//! Empty ──publish──► Populated ──publish──► Populated ...
//! ```
//!
//! # Synchronization
//!
//! A single exclusive lock guards the item collection. A publish transforms
//! the incoming set before taking the lock and swaps the finished collection
//! in, so the lock is held only for the swap. A reader holding the lock sees
//! either the complete previous collection or the complete new one, never a
//! mix of the two.
//!
//! # Example
//!
//! ```ignore
//! use blobhub::display::DisplayBuffer;
//!
//! let buffer = DisplayBuffer::new(1920.0, 480.0);
//! buffer.publish_set(&set);
//!
//! // In the render loop
//! buffer.with_snapshot(|snapshot| {
//!     for primitive in snapshot.primitives() {
//!         draw(primitive);
//!     }
//! });
//! ```

mod buffer;
mod render;

pub use buffer::{
    BufferState, DisplayBuffer, DisplayItem, DisplaySnapshot, Viewport, DEFAULT_VIEWPORT_HEIGHT,
    DEFAULT_VIEWPORT_WIDTH,
};
pub use render::{RenderPrimitive, BAND_WIDTH, LABEL_OFFSET, MARKER_RADIUS};
