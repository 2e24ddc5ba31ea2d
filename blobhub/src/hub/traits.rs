//! Capability and collaborator interfaces around the hub.
//!
//! All traits here are `Send + Sync`: the hub calls them concurrently from
//! every source thread. Implementations own their internal synchronization.

use crate::detection::RawBatch;
use crate::track::TrackRecordSet;

/// Receives raw detection batches from detection sources.
///
/// Called on the producing source's thread. Calls for one source never
/// overlap; calls from different sources may.
pub trait RawBatchSink: Send + Sync {
    /// Handle one batch. The batch is only valid for the duration of the call.
    fn on_raw_batch(&self, batch: &RawBatch);
}

/// Receives complete track record sets.
pub trait TrackRecordSink: Send + Sync {
    /// Handle a set that replaces whatever was received before.
    fn on_track_record_set(&self, set: &TrackRecordSet);
}

/// Receives render-target resize notifications.
pub trait ViewportObserver: Send + Sync {
    /// The render target now measures `width`×`height` pixels.
    fn on_viewport_resize(&self, width: f32, height: f32);
}

/// Out-of-process sink for raw detection batches.
///
/// The hub calls `forward` before interpretation and does not inspect the
/// outcome. Transport failures are the forwarder's to log and count; they
/// must not block or fail the caller beyond the time spent trying.
pub trait TelemetryForwarder: Send + Sync {
    /// Forward a raw batch, tagged with its source index.
    fn forward(&self, batch: &RawBatch);
}

/// Network endpoint that re-encodes every track record set.
///
/// Broadcasters receive the full set on every update, synchronously and in
/// registration order. Transport failures stay inside the broadcaster.
pub trait ProtocolBroadcaster: Send + Sync {
    /// Publish the full set.
    fn publish(&self, set: &TrackRecordSet);

    /// Human-readable endpoint name for logs and status output.
    fn name(&self) -> String;
}
