//! The event hub and its dispatch path.

use std::sync::Arc;

use tracing::{debug, warn};

use super::builder::HubBuilder;
use super::metrics::{HubMetrics, HubStatus};
use super::registry::SourceRegistry;
use super::traits::{
    ProtocolBroadcaster, RawBatchSink, TelemetryForwarder, TrackRecordSink, ViewportObserver,
};
use crate::detection::RawBatch;
use crate::display::DisplayBuffer;
use crate::interpreter::InterpretationEngine;
use crate::track::TrackRecordSet;

/// Single coordination point between detection sources and consumers.
///
/// The hub exclusively owns its forwarder, engine and broadcasters; they are
/// released when the hub is dropped. The display buffer is shared with the
/// render loop.
///
/// # Thread Safety
///
/// The only state the hub itself holds is the registration table, frozen at
/// build time, and atomic counters. Dispatch needs no hub-level lock.
pub struct EventHub {
    pub(super) registry: SourceRegistry,
    pub(super) forwarder: Option<Box<dyn TelemetryForwarder>>,
    pub(super) engine: Box<dyn InterpretationEngine>,
    pub(super) broadcasters: Vec<Box<dyn ProtocolBroadcaster>>,
    pub(super) display: Arc<DisplayBuffer>,
    pub(super) metrics: HubMetrics,
    pub(super) person_tracking: bool,
    pub(super) receiver_enabled: bool,
}

impl EventHub {
    /// Start building a hub around `engine`.
    pub fn builder(engine: Box<dyn InterpretationEngine>) -> HubBuilder {
        HubBuilder::new(engine)
    }

    /// The display buffer read by the render loop.
    pub fn display(&self) -> &Arc<DisplayBuffer> {
        &self.display
    }

    /// The frozen registration table.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Number of registered detection sources.
    pub fn source_count(&self) -> usize {
        self.registry.len()
    }

    /// Names of the registered broadcasters, in publish order.
    pub fn broadcaster_names(&self) -> Vec<String> {
        self.broadcasters.iter().map(|b| b.name()).collect()
    }

    /// Dispatch counters.
    pub fn metrics(&self) -> &HubMetrics {
        &self.metrics
    }

    /// Status snapshot for the render loop.
    pub fn status(&self) -> HubStatus {
        HubStatus {
            telemetry_enabled: self.forwarder.is_some(),
            receiver_enabled: self.receiver_enabled,
            broadcast_enabled: !self.broadcasters.is_empty(),
            person_tracking: self.person_tracking,
            source_count: self.registry.len(),
            broadcaster_count: self.broadcasters.len(),
            display_state: self.display.state(),
            metrics: self.metrics.snapshot(),
        }
    }
}

impl RawBatchSink for EventHub {
    fn on_raw_batch(&self, batch: &RawBatch) {
        if !self.registry.contains(batch.source) {
            warn!(source = %batch.source, "Dropping batch from unregistered source");
            self.metrics.batch_rejected();
            return;
        }
        self.metrics.batch_received(batch.len());

        if let Some(forwarder) = &self.forwarder {
            forwarder.forward(batch);
        }

        match self.engine.ingest(batch) {
            Some(set) => self.on_track_record_set(&set),
            None => debug!(source = %batch.source, "Batch produced no track records"),
        }
    }
}

impl TrackRecordSink for EventHub {
    fn on_track_record_set(&self, set: &TrackRecordSet) {
        for broadcaster in &self.broadcasters {
            broadcaster.publish(set);
        }
        self.display.on_track_record_set(set);
        self.metrics.set_published();
    }
}

impl ViewportObserver for EventHub {
    fn on_viewport_resize(&self, width: f32, height: f32) {
        debug!(width, height, "Viewport resized");
        self.display.on_viewport_resize(width, height);
    }
}

impl TrackRecordSink for DisplayBuffer {
    fn on_track_record_set(&self, set: &TrackRecordSet) {
        self.publish_set(set);
    }
}

impl ViewportObserver for DisplayBuffer {
    fn on_viewport_resize(&self, width: f32, height: f32) {
        DisplayBuffer::on_viewport_resize(self, width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    use crate::detection::{RawDetection, SourceIndex};
    use crate::display::BufferState;
    use crate::hub::HubError;
    use crate::source::{DetectionSource, SimulatedSource, SimulatedSourceConfig};
    use crate::track::TrackRecord;

    /// Engine returning a fixed set, or nothing.
    struct FixedEngine {
        output: Option<TrackRecordSet>,
    }

    impl FixedEngine {
        fn new(output: Option<TrackRecordSet>) -> Self {
            Self { output }
        }
    }

    impl InterpretationEngine for FixedEngine {
        fn ingest(&self, _batch: &RawBatch) -> Option<TrackRecordSet> {
            self.output.clone()
        }
    }

    /// Shared call log so tests can observe publish order across collaborators.
    type CallLog = Arc<Mutex<Vec<String>>>;

    struct RecordingForwarder {
        log: CallLog,
    }

    impl TelemetryForwarder for RecordingForwarder {
        fn forward(&self, batch: &RawBatch) {
            self.log.lock().push(format!("forward:{}", batch.source.get()));
        }
    }

    struct RecordingBroadcaster {
        name: String,
        log: CallLog,
        received: Arc<Mutex<Vec<TrackRecordSet>>>,
    }

    impl ProtocolBroadcaster for RecordingBroadcaster {
        fn publish(&self, set: &TrackRecordSet) {
            self.log.lock().push(format!("publish:{}", self.name));
            self.received.lock().push(set.clone());
        }

        fn name(&self) -> String {
            self.name.clone()
        }
    }

    fn one_track() -> TrackRecordSet {
        vec![TrackRecord::point(7, 0.5, 0.5)].into()
    }

    fn source(name: &str) -> SimulatedSource {
        SimulatedSource::new(name, SimulatedSourceConfig::default())
    }

    fn batch(index: usize) -> RawBatch {
        RawBatch::new(SourceIndex(index), vec![RawDetection::hand(0.5, 0.5, 1)])
    }

    #[test]
    fn test_unregistered_batch_is_dropped() {
        let hub = EventHub::builder(Box::new(FixedEngine::new(Some(one_track())))).build();
        hub.on_raw_batch(&batch(3));

        let status = hub.status();
        assert_eq!(status.metrics.batches_rejected, 1);
        assert_eq!(status.metrics.sets_published, 0);
        assert_eq!(hub.display().state(), BufferState::Empty);
    }

    #[test]
    fn test_forward_happens_before_broadcast() {
        let log: CallLog = Arc::default();
        let received = Arc::default();
        let mut builder = EventHub::builder(Box::new(FixedEngine::new(Some(one_track()))))
            .forwarder(Some(Box::new(RecordingForwarder { log: log.clone() })))
            .add_broadcaster(Box::new(RecordingBroadcaster {
                name: "a".to_string(),
                log: log.clone(),
                received: Arc::clone(&received),
            }));
        builder.register_source(&source("s0"), SourceIndex(0)).unwrap();
        let hub = builder.build();

        hub.on_raw_batch(&batch(0));
        assert_eq!(*log.lock(), vec!["forward:0", "publish:a"]);
    }

    #[test]
    fn test_no_forwarder_means_no_forward() {
        let mut builder = EventHub::builder(Box::new(FixedEngine::new(Some(one_track()))))
            .forwarder(None);
        builder.register_source(&source("s0"), SourceIndex(0)).unwrap();
        let hub = builder.build();

        for _ in 0..10 {
            hub.on_raw_batch(&batch(0));
        }
        assert!(!hub.status().telemetry_enabled);
        assert_eq!(hub.status().metrics.sets_published, 10);
    }

    #[test]
    fn test_broadcasters_receive_identical_set_in_order() {
        let log: CallLog = Arc::default();
        let first = Arc::default();
        let second = Arc::default();
        let mut builder = EventHub::builder(Box::new(FixedEngine::new(Some(one_track()))))
            .add_broadcaster(Box::new(RecordingBroadcaster {
                name: "first".to_string(),
                log: log.clone(),
                received: Arc::clone(&first),
            }))
            .add_broadcaster(Box::new(RecordingBroadcaster {
                name: "second".to_string(),
                log: log.clone(),
                received: Arc::clone(&second),
            }));
        builder.register_source(&source("s0"), SourceIndex(0)).unwrap();
        let hub = builder.build();

        hub.on_raw_batch(&batch(0));
        hub.on_raw_batch(&batch(0));

        assert_eq!(
            *log.lock(),
            vec!["publish:first", "publish:second", "publish:first", "publish:second"]
        );
        assert_eq!(*first.lock(), vec![one_track(), one_track()]);
        assert_eq!(*first.lock(), *second.lock());
        assert_eq!(hub.broadcaster_names(), vec!["first", "second"]);
    }

    #[test]
    fn test_engine_without_output_publishes_nothing() {
        let mut builder = EventHub::builder(Box::new(FixedEngine::new(None)));
        builder.register_source(&source("s0"), SourceIndex(0)).unwrap();
        let hub = builder.build();

        hub.on_raw_batch(&batch(0));
        assert_eq!(hub.status().metrics.batches_received, 1);
        assert_eq!(hub.status().metrics.sets_published, 0);
        assert_eq!(hub.display().state(), BufferState::Empty);
    }

    #[test]
    fn test_display_uses_current_viewport() {
        let mut builder = EventHub::builder(Box::new(FixedEngine::new(Some(one_track()))));
        builder.register_source(&source("s0"), SourceIndex(0)).unwrap();
        let hub = builder.build();

        hub.on_viewport_resize(200.0, 100.0);
        hub.on_raw_batch(&batch(0));

        let items = hub.display().items();
        assert_eq!(items[0].x, 100.0);
        assert_eq!(items[0].y, 50.0);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut builder = EventHub::builder(Box::new(FixedEngine::new(None)));
        builder.register_source(&source("a"), SourceIndex(0)).unwrap();
        let err = builder
            .register_source(&source("b"), SourceIndex(0))
            .unwrap_err();
        assert!(matches!(err, HubError::DuplicateSource { .. }));
        assert_eq!(builder.source_count(), 1);
    }

    #[test]
    fn test_registration_passes_person_tracking_flag() {
        let tracked = source("tracked");
        let mut builder =
            EventHub::builder(Box::new(FixedEngine::new(None))).person_tracking(true);
        builder.register_source(&tracked, SourceIndex(0)).unwrap();

        assert!(tracked.person_tracking());
        assert!(builder.build().status().person_tracking);
    }
}
