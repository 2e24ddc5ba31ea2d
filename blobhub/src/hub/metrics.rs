//! Lock-free dispatch counters and the status surface for the render loop.
//!
//! ```text
//! Source threads ─────► HubMetrics ─────► MetricsSnapshot ─────► HubStatus
//!                   (atomic counters)   (point-in-time copy)   (render loop)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::display::BufferState;

/// Atomic counters updated on the dispatch path.
#[derive(Debug)]
pub struct HubMetrics {
    batches_received: AtomicU64,
    batches_rejected: AtomicU64,
    detections_received: AtomicU64,
    sets_published: AtomicU64,
    started_at: Instant,
}

impl HubMetrics {
    pub fn new() -> Self {
        Self {
            batches_received: AtomicU64::new(0),
            batches_rejected: AtomicU64::new(0),
            detections_received: AtomicU64::new(0),
            sets_published: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Record an accepted batch carrying `detections` detections.
    pub fn batch_received(&self, detections: usize) {
        self.batches_received.fetch_add(1, Ordering::Relaxed);
        self.detections_received
            .fetch_add(detections as u64, Ordering::Relaxed);
    }

    /// Record a batch dropped because its index was never registered.
    pub fn batch_rejected(&self) {
        self.batches_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a track record set published to consumers.
    pub fn set_published(&self) {
        self.sets_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of the counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            batches_received: self.batches_received.load(Ordering::Relaxed),
            batches_rejected: self.batches_rejected.load(Ordering::Relaxed),
            detections_received: self.detections_received.load(Ordering::Relaxed),
            sets_published: self.sets_published.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
        }
    }
}

impl Default for HubMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`HubMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub batches_received: u64,
    pub batches_rejected: u64,
    pub detections_received: u64,
    pub sets_published: u64,
    pub uptime: Duration,
}

impl MetricsSnapshot {
    /// Accepted batches per second since the hub was built.
    pub fn batches_per_second(&self) -> f64 {
        let secs = self.uptime.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.batches_received as f64 / secs
    }
}

/// Status shown by the render loop.
#[derive(Debug, Clone, PartialEq)]
pub struct HubStatus {
    /// A telemetry forwarder is configured.
    pub telemetry_enabled: bool,
    /// A network receiver feeds remote batches into the hub.
    pub receiver_enabled: bool,
    /// At least one protocol broadcaster is registered.
    pub broadcast_enabled: bool,
    /// Sources were asked to run the person tracking mode.
    pub person_tracking: bool,
    /// Number of registered detection sources.
    pub source_count: usize,
    /// Number of registered protocol broadcasters.
    pub broadcaster_count: usize,
    /// Display buffer state.
    pub display_state: BufferState,
    /// Dispatch counters.
    pub metrics: MetricsSnapshot,
}

impl HubStatus {
    /// Status lines in the order the render loop prints them.
    pub fn lines(&self) -> Vec<String> {
        let flag = |on: bool| if on { "YES" } else { "NO" };
        vec![
            format!("BROADCAST   : {}", flag(self.broadcast_enabled)),
            format!("SENDER      : {}", flag(self.telemetry_enabled)),
            format!("RECEIVER    : {}", flag(self.receiver_enabled)),
            format!("PERSTRACKING: {}", flag(self.person_tracking)),
            format!("Registered Sources: {}", self.source_count),
        ]
    }
}
