//! Core data types for track records.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Closed classification set for track records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackClass {
    /// A discrete contact point (e.g. a hand).
    Point,
    /// A region spanning the full sensed height (e.g. a person).
    Area,
}

impl TrackClass {
    /// Short label for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackClass::Point => "point",
            TrackClass::Area => "area",
        }
    }
}

impl fmt::Display for TrackClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A smoothed, identity-stable, classified observation.
///
/// Position is normalized to [0,1]×[0,1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Persistent identity, stable across ticks while the blob exists.
    pub id: u32,
    /// Smoothed horizontal position.
    pub x: f32,
    /// Smoothed vertical position.
    pub y: f32,
    /// Classification tag.
    pub class: TrackClass,
}

impl TrackRecord {
    /// Create a new track record.
    pub fn new(id: u32, x: f32, y: f32, class: TrackClass) -> Self {
        Self { id, x, y, class }
    }

    /// Create a point-like track record.
    pub fn point(id: u32, x: f32, y: f32) -> Self {
        Self::new(id, x, y, TrackClass::Point)
    }

    /// Create an area-like track record.
    pub fn area(id: u32, x: f32, y: f32) -> Self {
        Self::new(id, x, y, TrackClass::Area)
    }
}

/// The complete ordered sequence of track records valid at a given instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRecordSet {
    records: Vec<TrackRecord>,
}

impl TrackRecordSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TrackRecord> {
        self.records.iter()
    }

    /// Consume the set, returning the records.
    pub fn into_records(self) -> Vec<TrackRecord> {
        self.records
    }
}

impl From<Vec<TrackRecord>> for TrackRecordSet {
    fn from(records: Vec<TrackRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<TrackRecord> for TrackRecordSet {
    fn from_iter<I: IntoIterator<Item = TrackRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Deref for TrackRecordSet {
    type Target = [TrackRecord];

    fn deref(&self) -> &Self::Target {
        &self.records
    }
}

impl<'a> IntoIterator for &'a TrackRecordSet {
    type Item = &'a TrackRecord;
    type IntoIter = std::slice::Iter<'a, TrackRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
