//! Guarded display buffer and coordinate transform.

use parking_lot::Mutex;

use super::render::RenderPrimitive;
use crate::track::{TrackClass, TrackRecord, TrackRecordSet};

/// Default render-target width in pixels.
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1920.0;

/// Default render-target height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 480.0;

/// Render-target dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a viewport with the given dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Project a normalized track record into pixel coordinates.
    pub fn project(&self, record: &TrackRecord) -> DisplayItem {
        DisplayItem {
            x: record.x * self.width,
            y: record.y * self.height,
            id: record.id,
            class: record.class,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
    }
}

/// A track record transformed into render-target pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayItem {
    /// Horizontal pixel position.
    pub x: f32,
    /// Vertical pixel position.
    pub y: f32,
    /// Track identity.
    pub id: u32,
    /// Classification tag.
    pub class: TrackClass,
}

impl DisplayItem {
    /// The drawing instruction for this item.
    pub fn primitive(&self) -> RenderPrimitive {
        RenderPrimitive::for_item(self)
    }
}

/// Whether the buffer has received its first published set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// No set has been published yet.
    Empty,
    /// At least one set has been published.
    Populated,
}

/// Read-only view of the buffer handed to a snapshot closure.
#[derive(Debug)]
pub struct DisplaySnapshot<'a> {
    items: &'a [DisplayItem],
    generation: u64,
}

impl<'a> DisplaySnapshot<'a> {
    /// Items of the current collection.
    pub fn items(&self) -> &'a [DisplayItem] {
        self.items
    }

    /// Number of publishes applied so far. Zero while the buffer is empty.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Buffer state at the time of the snapshot.
    pub fn state(&self) -> BufferState {
        if self.generation == 0 {
            BufferState::Empty
        } else {
            BufferState::Populated
        }
    }

    /// Drawing instructions for every item, in order.
    pub fn primitives(&self) -> impl Iterator<Item = RenderPrimitive> + 'a {
        self.items.iter().map(DisplayItem::primitive)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

struct Frame {
    items: Vec<DisplayItem>,
    generation: u64,
}

/// Guarded, swappable buffer holding the latest renderable track records.
///
/// # Thread Safety
///
/// `publish` may be called from any producer thread and `with_snapshot` from
/// the render thread. Both take the same exclusive lock, so the render loop
/// never observes a partially rebuilt collection.
pub struct DisplayBuffer {
    frame: Mutex<Frame>,
    viewport: Mutex<Viewport>,
}

impl DisplayBuffer {
    /// Create an empty buffer with the given viewport dimensions.
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_viewport(Viewport::new(width, height))
    }

    /// Create an empty buffer with the given viewport.
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            frame: Mutex::new(Frame {
                items: Vec::new(),
                generation: 0,
            }),
            viewport: Mutex::new(viewport),
        }
    }

    /// Replace the collection with a projection of `set` into `width`×`height`.
    ///
    /// The previous collection is discarded in full; nothing carries over
    /// between publishes.
    pub fn publish(&self, set: &TrackRecordSet, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        let items: Vec<DisplayItem> = set.iter().map(|record| viewport.project(record)).collect();

        let previous = {
            let mut frame = self.frame.lock();
            frame.generation += 1;
            std::mem::replace(&mut frame.items, items)
        };
        drop(previous);
    }

    /// Publish `set` using the currently stored viewport.
    pub fn publish_set(&self, set: &TrackRecordSet) {
        let viewport = self.viewport();
        self.publish(set, viewport.width, viewport.height);
    }

    /// Run `f` against the current collection while holding the lock.
    ///
    /// Keep `f` short: publishers wait for it to return.
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&DisplaySnapshot<'_>) -> R) -> R {
        let frame = self.frame.lock();
        let snapshot = DisplaySnapshot {
            items: &frame.items,
            generation: frame.generation,
        };
        f(&snapshot)
    }

    /// Copy of the current collection.
    pub fn items(&self) -> Vec<DisplayItem> {
        self.with_snapshot(|snapshot| snapshot.items().to_vec())
    }

    /// Current buffer state.
    pub fn state(&self) -> BufferState {
        self.with_snapshot(|snapshot| snapshot.state())
    }

    /// Update the viewport used by subsequent `publish_set` calls.
    ///
    /// The current collection is not rescaled.
    pub fn on_viewport_resize(&self, width: f32, height: f32) {
        *self.viewport.lock() = Viewport::new(width, height);
    }

    /// The viewport used by `publish_set`.
    pub fn viewport(&self) -> Viewport {
        *self.viewport.lock()
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::with_viewport(Viewport::default())
    }
}
