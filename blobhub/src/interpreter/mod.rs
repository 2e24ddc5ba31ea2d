//! Interpretation engine contract and a reference correlating engine.
//!
//! The hub pushes every accepted [`RawBatch`] into an
//! [`InterpretationEngine`] on the producing source's thread and publishes
//! whatever [`TrackRecordSet`] comes back. Engines are called concurrently
//! from all source threads and must serialize their own state.
//!
//! [`CorrelatingInterpreter`] is the engine used by the application: it
//! correlates detections against live tracks by distance, smooths matched
//! positions and keeps identities stable across ticks.

mod config;
mod correlating;

pub use config::{
    CorrelationConfig, GestureRadii, DEFAULT_POINT_RADIUS, DEFAULT_REGION_RADIUS,
    DEFAULT_SMOOTHING,
};
pub use correlating::CorrelatingInterpreter;

use crate::detection::RawBatch;
use crate::track::TrackRecordSet;

/// Turns raw detection batches into identity-stable track records.
///
/// # Thread Safety
///
/// `ingest` is called concurrently from every source thread. The hub does
/// not serialize calls; implementations must.
pub trait InterpretationEngine: Send + Sync {
    /// Ingest one batch and return the complete track set valid afterwards.
    ///
    /// Returns `None` when the batch produces no output, in which case the
    /// hub publishes nothing for it.
    fn ingest(&self, batch: &RawBatch) -> Option<TrackRecordSet>;
}
