//! Concurrent fan-in/fan-out event hub.
//!
//! The [`EventHub`] is the single coordination point between detection
//! sources and everything downstream of them. Each source thread calls
//! [`RawBatchSink::on_raw_batch`] directly; the hub forwards the batch to the
//! telemetry forwarder, runs it through the interpretation engine and
//! republishes the resulting [`TrackRecordSet`](crate::track::TrackRecordSet)
//! to every broadcaster and to the display buffer.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                            EventHub                               │
//! │                                                                   │
//! │  on_raw_batch(batch) ── registry check ──► reject (unknown index) │
//! │          │                                                        │
//! │          ├──► TelemetryForwarder::forward       (if configured)   │
//! │          └──► InterpretationEngine::ingest                        │
//! │                        │ Some(set)                                │
//! │                        ▼                                          │
//! │  on_track_record_set(set)                                         │
//! │          ├──► ProtocolBroadcaster::publish × N  (in order)        │
//! │          └──► DisplayBuffer::publish_set                          │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything above runs on the calling source's thread. There is no
//! internal queue or scheduler; a slow consumer stalls the producing source.
//! Wrap a broadcaster in [`QueuedBroadcaster`](crate::network::QueuedBroadcaster)
//! to move it off the producer thread.
//!
//! # Capability Traits
//!
//! The hub is reached through three narrow interfaces:
//!
//! - [`RawBatchSink`] - receives raw batches from sources
//! - [`TrackRecordSink`] - receives interpreted track records
//! - [`ViewportObserver`] - receives render-target resize notifications
//!
//! # Example
//!
//! ```ignore
//! use blobhub::hub::{EventHub, RawBatchSink};
//!
//! let mut builder = EventHub::builder(Box::new(engine)).add_broadcaster(Box::new(udp));
//! builder.register_source(&source, SourceIndex(0))?;
//! let hub = Arc::new(builder.build());
//!
//! // On the source thread
//! hub.on_raw_batch(&batch);
//!
//! // On the render thread
//! hub.display().with_snapshot(|snapshot| draw(snapshot));
//! ```

mod builder;
mod error;
mod event_hub;
mod metrics;
mod registry;
mod traits;

pub use builder::HubBuilder;
pub use error::HubError;
pub use event_hub::EventHub;
pub use metrics::{HubMetrics, HubStatus, MetricsSnapshot};
pub use registry::{SourceRegistration, SourceRegistry, MAX_SOURCES};
pub use traits::{
    ProtocolBroadcaster, RawBatchSink, TelemetryForwarder, TrackRecordSink, ViewportObserver,
};
