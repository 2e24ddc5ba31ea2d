//! Core data types for raw detections.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::track::TrackClass;

/// Stable index binding a detection source to the hub.
///
/// Assigned once at registration and carried by every batch the source
/// emits. The hub never reassigns indices at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceIndex(pub usize);

impl SourceIndex {
    /// Create a new source index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The raw index value.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SourceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for SourceIndex {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

/// Raw classification hint reported by the sensor.
///
/// Sensors distinguish discrete contacts (hands) from region-spanning
/// detections (people). The interpretation engine turns the hint into a
/// [`TrackClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobHint {
    /// A discrete contact such as a hand.
    Hand,
    /// A region spanning the full sensed height, such as a person.
    Person,
}

impl BlobHint {
    /// The track classification this hint maps to.
    pub fn track_class(&self) -> TrackClass {
        match self {
            BlobHint::Hand => TrackClass::Point,
            BlobHint::Person => TrackClass::Area,
        }
    }
}

/// One sensed blob from one source.
///
/// Positions are in sensor-local normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Horizontal position in sensor-local normalized space.
    pub x: f32,
    /// Vertical position in sensor-local normalized space.
    pub y: f32,
    /// Identity assigned by the sensor; only meaningful within one source.
    pub id: u32,
    /// Raw classification hint.
    pub hint: BlobHint,
}

impl RawDetection {
    /// Create a new raw detection.
    pub fn new(x: f32, y: f32, id: u32, hint: BlobHint) -> Self {
        Self { x, y, id, hint }
    }

    /// Create a hand detection.
    pub fn hand(x: f32, y: f32, id: u32) -> Self {
        Self::new(x, y, id, BlobHint::Hand)
    }

    /// Create a person detection.
    pub fn person(x: f32, y: f32, id: u32) -> Self {
        Self::new(x, y, id, BlobHint::Person)
    }
}

/// Ordered detections produced by one source in one acquisition tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBatch {
    /// Index of the source that produced this batch.
    pub source: SourceIndex,
    /// Detections in emission order.
    pub detections: Vec<RawDetection>,
}

impl RawBatch {
    /// Create a new batch for the given source.
    pub fn new(source: SourceIndex, detections: Vec<RawDetection>) -> Self {
        Self { source, detections }
    }

    /// Number of detections in the batch.
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Whether the batch carries no detections.
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
