//! Integration tests for the event hub.
//!
//! These tests drive the hub through its public surface only:
//! - raw batch → engine → broadcasters → display buffer
//! - registration rules
//! - concurrent publishers and readers on the display buffer
//!
//! Run with: `cargo test --test hub_integration`

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use parking_lot::Mutex;

use blobhub::detection::{RawBatch, RawDetection, SourceIndex};
use blobhub::display::{BufferState, DisplayBuffer, RenderPrimitive};
use blobhub::hub::{
    EventHub, HubError, ProtocolBroadcaster, RawBatchSink, TelemetryForwarder, TrackRecordSink,
    ViewportObserver,
};
use blobhub::interpreter::{CorrelatingInterpreter, InterpretationEngine};
use blobhub::source::{DetectionSource, SourceError};
use blobhub::track::{TrackClass, TrackRecord, TrackRecordSet};

// ============================================================================
// Test Doubles
// ============================================================================

/// A source that never emits on its own; tests push batches directly.
struct ManualSource {
    name: String,
    person_tracking: AtomicBool,
}

impl ManualSource {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            person_tracking: AtomicBool::new(false),
        }
    }
}

impl DetectionSource for ManualSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn set_enable_person_tracking(&self, enabled: bool) {
        self.person_tracking.store(enabled, Ordering::Relaxed);
    }

    fn person_tracking(&self) -> bool {
        self.person_tracking.load(Ordering::Relaxed)
    }

    fn start(&self, _index: SourceIndex, _sink: Arc<dyn RawBatchSink>) -> Result<(), SourceError> {
        Ok(())
    }

    fn stop(&self) {}

    fn is_running(&self) -> bool {
        false
    }
}

/// Returns the same set for every batch.
struct StubEngine {
    set: TrackRecordSet,
}

impl InterpretationEngine for StubEngine {
    fn ingest(&self, _batch: &RawBatch) -> Option<TrackRecordSet> {
        Some(self.set.clone())
    }
}

/// Echoes each detection as a point record whose id is the source index.
struct EchoEngine;

impl InterpretationEngine for EchoEngine {
    fn ingest(&self, batch: &RawBatch) -> Option<TrackRecordSet> {
        Some(
            batch
                .detections
                .iter()
                .map(|d| TrackRecord::point(batch.source.get() as u32, d.x, d.y))
                .collect(),
        )
    }
}

struct CountingForwarder {
    calls: Arc<AtomicUsize>,
}

impl TelemetryForwarder for CountingForwarder {
    fn forward(&self, _batch: &RawBatch) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

type PublishLog = Arc<Mutex<Vec<(String, TrackRecordSet)>>>;

struct LoggingBroadcaster {
    name: String,
    log: PublishLog,
}

impl ProtocolBroadcaster for LoggingBroadcaster {
    fn publish(&self, set: &TrackRecordSet) {
        self.log.lock().push((self.name.clone(), set.clone()));
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn point_set(id: u32, x: f32, y: f32) -> TrackRecordSet {
    TrackRecordSet::from(vec![TrackRecord::point(id, x, y)])
}

/// Build a hub over two manual sources at indices 0 and 1.
fn two_source_hub(engine: Box<dyn InterpretationEngine>) -> (EventHub, Arc<DisplayBuffer>) {
    let display = Arc::new(DisplayBuffer::new(1920.0, 480.0));
    let mut builder = EventHub::builder(engine).display(Arc::clone(&display));
    builder
        .register_source(&ManualSource::new("left"), SourceIndex(0))
        .unwrap();
    builder
        .register_source(&ManualSource::new("right"), SourceIndex(1))
        .unwrap();
    (builder.build(), display)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_point_detection_reaches_display_in_pixels() {
    let (hub, display) = two_source_hub(Box::new(StubEngine {
        set: point_set(7, 0.5, 0.5),
    }));

    hub.on_raw_batch(&RawBatch::new(
        SourceIndex(0),
        vec![RawDetection::hand(0.5, 0.5, 1)],
    ));

    let items = display.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].x, 960.0);
    assert_eq!(items[0].y, 240.0);
    assert_eq!(items[0].id, 7);
    assert_eq!(items[0].class, TrackClass::Point);
    assert_eq!(hub.source_count(), 2);
}

#[test]
fn test_display_driven_without_collaborators() {
    let (hub, display) = two_source_hub(Box::new(EchoEngine));
    assert_eq!(display.state(), BufferState::Empty);
    assert!(hub.broadcaster_names().is_empty());

    hub.on_raw_batch(&RawBatch::new(
        SourceIndex(1),
        vec![RawDetection::hand(0.25, 0.75, 3)],
    ));

    assert_eq!(display.state(), BufferState::Populated);
    let items = display.items();
    assert_eq!(items.len(), 1);
    assert_eq!((items[0].x, items[0].y), (480.0, 360.0));

    let status = hub.status();
    assert!(!status.telemetry_enabled);
    assert!(!status.broadcast_enabled);
    assert_eq!(status.metrics.sets_published, 1);
}

#[test]
fn test_duplicate_registration_is_rejected_before_processing() {
    let mut builder = EventHub::builder(Box::new(EchoEngine));
    builder
        .register_source(&ManualSource::new("first"), SourceIndex(0))
        .unwrap();

    let err = builder
        .register_source(&ManualSource::new("second"), SourceIndex(0))
        .unwrap_err();
    assert!(matches!(err, HubError::DuplicateSource { .. }));
    assert_eq!(builder.source_count(), 1);
}

#[test]
fn test_out_of_range_registration_is_rejected() {
    let mut builder = EventHub::builder(Box::new(EchoEngine));
    let err = builder
        .register_source(&ManualSource::new("far"), SourceIndex(10_000))
        .unwrap_err();
    assert!(matches!(err, HubError::IndexOutOfRange { .. }));
}

#[test]
fn test_person_tracking_flag_passed_to_sources() {
    let source = ManualSource::new("sensor");
    let mut builder = EventHub::builder(Box::new(EchoEngine)).person_tracking(true);
    builder.register_source(&source, SourceIndex(0)).unwrap();
    assert!(source.person_tracking());
}

// ============================================================================
// Collaborator Properties
// ============================================================================

#[test]
fn test_forwarder_called_only_when_configured() {
    let (hub, _display) = two_source_hub(Box::new(EchoEngine));
    for i in 0..20 {
        hub.on_raw_batch(&RawBatch::new(
            SourceIndex(i % 2),
            vec![RawDetection::hand(0.5, 0.5, 1)],
        ));
    }
    assert!(!hub.status().telemetry_enabled);

    let calls = Arc::new(AtomicUsize::new(0));
    let mut builder = EventHub::builder(Box::new(EchoEngine)).forwarder(Some(Box::new(
        CountingForwarder {
            calls: Arc::clone(&calls),
        },
    )));
    builder
        .register_source(&ManualSource::new("only"), SourceIndex(0))
        .unwrap();
    let hub = builder.build();
    for _ in 0..5 {
        hub.on_raw_batch(&RawBatch::new(SourceIndex(0), Vec::new()));
    }
    assert_eq!(calls.load(Ordering::Relaxed), 5);
}

#[test]
fn test_broadcasters_receive_identical_set_in_registration_order() {
    let log: PublishLog = Arc::new(Mutex::new(Vec::new()));
    let mut builder = EventHub::builder(Box::new(EchoEngine));
    for name in ["a", "b", "c"] {
        builder = builder.add_broadcaster(Box::new(LoggingBroadcaster {
            name: name.to_string(),
            log: Arc::clone(&log),
        }));
    }
    builder
        .register_source(&ManualSource::new("only"), SourceIndex(0))
        .unwrap();
    let hub = builder.build();

    hub.on_raw_batch(&RawBatch::new(
        SourceIndex(0),
        vec![RawDetection::hand(0.1, 0.2, 1)],
    ));
    hub.on_raw_batch(&RawBatch::new(
        SourceIndex(0),
        vec![RawDetection::hand(0.3, 0.4, 1)],
    ));

    let log = log.lock();
    let names: Vec<&str> = log.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "a", "b", "c"]);
    for publish in log.chunks(3) {
        assert_eq!(publish[0].1, publish[1].1);
        assert_eq!(publish[1].1, publish[2].1);
    }
    assert_ne!(log[0].1, log[3].1);
}

#[test]
fn test_area_records_render_as_bands() {
    let set = TrackRecordSet::from(vec![
        TrackRecord::area(1, 0.5, 0.1),
        TrackRecord::area(2, 0.5, 0.9),
        TrackRecord::point(3, 0.5, 0.9),
    ]);
    let display = DisplayBuffer::new(1920.0, 480.0);
    display.publish(&set, 1920.0, 480.0);

    let primitives: Vec<RenderPrimitive> =
        display.with_snapshot(|snapshot| snapshot.primitives().collect());
    assert_eq!(primitives[0], primitives[1]);
    assert!(matches!(primitives[0], RenderPrimitive::Band { x, .. } if x == 960.0));
    match &primitives[2] {
        RenderPrimitive::Marker { x, y, label, .. } => {
            assert_eq!((*x, *y), (960.0, 432.0));
            assert_eq!(label, "3");
        }
        other => panic!("expected a marker, got {:?}", other),
    }
}

#[test]
fn test_viewport_resize_applies_to_next_publish_only() {
    let (hub, display) = two_source_hub(Box::new(EchoEngine));
    hub.on_raw_batch(&RawBatch::new(
        SourceIndex(0),
        vec![RawDetection::hand(0.5, 0.5, 1)],
    ));
    hub.on_viewport_resize(100.0, 100.0);
    assert_eq!(display.items()[0].x, 960.0);

    hub.on_raw_batch(&RawBatch::new(
        SourceIndex(0),
        vec![RawDetection::hand(0.5, 0.5, 1)],
    ));
    assert_eq!(display.items()[0].x, 50.0);
}

// ============================================================================
// Concurrency
// ============================================================================

/// Many publishers and readers: every snapshot comes from exactly one set.
///
/// Set `k` holds `k + 1` records all carrying id `k`, so a mixed collection
/// shows up either as two ids or as a size that does not match the id.
#[test]
fn test_no_partial_snapshot_under_concurrent_publish() {
    const PUBLISHERS: usize = 8;
    const READERS: usize = 4;
    const ROUNDS: usize = 500;

    let display = Arc::new(DisplayBuffer::new(1920.0, 480.0));
    let barrier = Arc::new(Barrier::new(PUBLISHERS + READERS));
    let done = Arc::new(AtomicBool::new(false));

    let publishers: Vec<_> = (0..PUBLISHERS)
        .map(|p| {
            let display = Arc::clone(&display);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for round in 0..ROUNDS {
                    let id = (p * ROUNDS + round) % 32;
                    let set: TrackRecordSet = (0..=id)
                        .map(|i| TrackRecord::point(id as u32, i as f32 / 32.0, 0.5))
                        .collect();
                    display.publish(&set, 1920.0, 480.0);
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let display = Arc::clone(&display);
            let barrier = Arc::clone(&barrier);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                barrier.wait();
                let mut checked = 0usize;
                while !done.load(Ordering::Acquire) {
                    display.with_snapshot(|snapshot| {
                        let items = snapshot.items();
                        if let Some(first) = items.first() {
                            assert!(items.iter().all(|item| item.id == first.id));
                            assert_eq!(items.len(), first.id as usize + 1);
                        }
                    });
                    checked += 1;
                }
                checked
            })
        })
        .collect();

    for publisher in publishers {
        publisher.join().unwrap();
    }
    done.store(true, Ordering::Release);
    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }

    display.with_snapshot(|snapshot| {
        assert_eq!(snapshot.generation(), (PUBLISHERS * ROUNDS) as u64);
    });
}

/// Concurrent sources through the full hub path with the reference engine.
#[test]
fn test_concurrent_sources_through_hub() {
    const SOURCES: usize = 4;
    const BATCHES: usize = 200;

    let display = Arc::new(DisplayBuffer::new(1920.0, 480.0));
    let mut builder = EventHub::builder(Box::new(CorrelatingInterpreter::with_defaults()))
        .display(Arc::clone(&display));
    let sources: Vec<ManualSource> = (0..SOURCES)
        .map(|i| ManualSource::new(&format!("s{}", i)))
        .collect();
    for (i, source) in sources.iter().enumerate() {
        builder.register_source(source, SourceIndex(i)).unwrap();
    }
    let hub = Arc::new(builder.build());

    let handles: Vec<_> = (0..SOURCES)
        .map(|i| {
            let hub = Arc::clone(&hub);
            thread::spawn(move || {
                for b in 0..BATCHES {
                    let x = (b % 10) as f32 / 10.0;
                    hub.on_raw_batch(&RawBatch::new(
                        SourceIndex(i),
                        vec![RawDetection::hand(x, 0.5, 1)],
                    ));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = hub.metrics().snapshot();
    assert_eq!(metrics.batches_received, (SOURCES * BATCHES) as u64);
    assert_eq!(metrics.sets_published, (SOURCES * BATCHES) as u64);
    assert_eq!(display.state(), BufferState::Populated);
}

/// Batches of one source are processed in emission order.
#[test]
fn test_per_source_order_is_preserved() {
    let log: PublishLog = Arc::new(Mutex::new(Vec::new()));
    let mut builder = EventHub::builder(Box::new(EchoEngine)).add_broadcaster(Box::new(
        LoggingBroadcaster {
            name: "log".to_string(),
            log: Arc::clone(&log),
        },
    ));
    builder
        .register_source(&ManualSource::new("a"), SourceIndex(0))
        .unwrap();
    builder
        .register_source(&ManualSource::new("b"), SourceIndex(1))
        .unwrap();
    let hub = Arc::new(builder.build());

    let handles: Vec<_> = (0..2usize)
        .map(|i| {
            let hub = Arc::clone(&hub);
            thread::spawn(move || {
                for step in 0..100 {
                    hub.on_raw_batch(&RawBatch::new(
                        SourceIndex(i),
                        vec![RawDetection::hand(step as f32 / 100.0, 0.0, 1)],
                    ));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut last_x: HashMap<u32, f32> = HashMap::new();
    for (_, set) in log.lock().iter() {
        let record = set[0];
        if let Some(previous) = last_x.insert(record.id, record.x) {
            assert!(record.x > previous);
        }
    }
    assert_eq!(last_x.len(), 2);
}

#[test]
fn test_unregistered_batches_are_dropped() {
    let (hub, display) = two_source_hub(Box::new(EchoEngine));
    hub.on_raw_batch(&RawBatch::new(
        SourceIndex(9),
        vec![RawDetection::hand(0.5, 0.5, 1)],
    ));
    assert_eq!(display.state(), BufferState::Empty);
    assert_eq!(hub.metrics().snapshot().batches_rejected, 1);

    // Direct set delivery bypasses registration.
    hub.on_track_record_set(&point_set(1, 0.0, 0.0));
    assert_eq!(display.state(), BufferState::Populated);
}
