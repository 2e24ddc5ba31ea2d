//! Bounded asynchronous wrapper for protocol broadcasters.
//!
//! ```text
//! hub thread ──publish──▶ [ bounded queue ] ──▶ worker thread ──▶ inner
//!                              │
//!                              └─ full: drop set, count
//! ```
//!
//! The hub never blocks on a slow broadcaster. Sets that arrive while the
//! queue is full are dropped; the next set supersedes them anyway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::error::NetworkError;
use crate::hub::ProtocolBroadcaster;
use crate::track::TrackRecordSet;

/// Default number of sets buffered per queued broadcaster.
pub const DEFAULT_QUEUE_CAPACITY: usize = 4;

/// Runs an inner broadcaster on its own thread behind a bounded queue.
pub struct QueuedBroadcaster {
    name: String,
    sender: Mutex<Option<SyncSender<TrackRecordSet>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    delivered: Arc<AtomicU64>,
    dropped: AtomicU64,
}

impl QueuedBroadcaster {
    /// Wrap `inner`. A capacity of zero is raised to one.
    pub fn new(
        inner: Box<dyn ProtocolBroadcaster>,
        capacity: usize,
    ) -> Result<Self, NetworkError> {
        let name = inner.name();
        let (sender, receiver) = mpsc::sync_channel::<TrackRecordSet>(capacity.max(1));
        let delivered = Arc::new(AtomicU64::new(0));
        let worker_delivered = Arc::clone(&delivered);

        let worker = std::thread::Builder::new()
            .name(format!("broadcast-{}", name))
            .spawn(move || {
                for set in receiver {
                    inner.publish(&set);
                    worker_delivered.fetch_add(1, Ordering::Relaxed);
                }
                debug!(broadcaster = %inner.name(), "Queued broadcaster drained");
            })?;

        Ok(Self {
            name,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            delivered,
            dropped: AtomicU64::new(0),
        })
    }

    /// Sets handed to the inner broadcaster so far.
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Sets dropped because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Stop accepting sets, deliver what is queued, and join the worker.
    pub fn close(&self) {
        self.sender.lock().take();
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                warn!(broadcaster = %self.name, "Broadcast worker panicked");
            }
        }
    }
}

impl ProtocolBroadcaster for QueuedBroadcaster {
    fn publish(&self, set: &TrackRecordSet) {
        let sender = self.sender.lock();
        let Some(sender) = sender.as_ref() else {
            return;
        };
        match sender.try_send(set.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if dropped == 1 || dropped % 100 == 0 {
                    warn!(broadcaster = %self.name, dropped, "Broadcast queue full, dropping set");
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(broadcaster = %self.name, "Broadcast worker gone");
            }
        }
    }

    fn name(&self) -> String {
        format!("queued({})", self.name)
    }
}

impl Drop for QueuedBroadcaster {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::time::Duration;

    use crate::track::TrackRecord;

    struct CollectingBroadcaster {
        sets: Arc<Mutex<Vec<TrackRecordSet>>>,
    }

    impl ProtocolBroadcaster for CollectingBroadcaster {
        fn publish(&self, set: &TrackRecordSet) {
            self.sets.lock().push(set.clone());
        }

        fn name(&self) -> String {
            "collect".to_string()
        }
    }

    /// Blocks on the barrier for its first publish.
    struct GatedBroadcaster {
        gate: Arc<Barrier>,
        gated: Mutex<bool>,
    }

    impl ProtocolBroadcaster for GatedBroadcaster {
        fn publish(&self, _set: &TrackRecordSet) {
            let mut gated = self.gated.lock();
            if !*gated {
                *gated = true;
                self.gate.wait();
            }
        }

        fn name(&self) -> String {
            "gated".to_string()
        }
    }

    fn set(id: u32) -> TrackRecordSet {
        TrackRecordSet::from(vec![TrackRecord::point(id, 0.5, 0.5)])
    }

    #[test]
    fn test_delivers_in_order_on_close() {
        let sets = Arc::new(Mutex::new(Vec::new()));
        let queued = QueuedBroadcaster::new(
            Box::new(CollectingBroadcaster { sets: sets.clone() }),
            8,
        )
        .unwrap();
        assert_eq!(queued.name(), "queued(collect)");

        for id in 1..=3 {
            queued.publish(&set(id));
        }
        queued.close();

        let ids: Vec<u32> = sets.lock().iter().map(|s| s[0].id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(queued.delivered(), 3);
        assert_eq!(queued.dropped(), 0);
    }

    #[test]
    fn test_full_queue_drops_instead_of_blocking() {
        let gate = Arc::new(Barrier::new(2));
        let queued = QueuedBroadcaster::new(
            Box::new(GatedBroadcaster {
                gate: gate.clone(),
                gated: Mutex::new(false),
            }),
            1,
        )
        .unwrap();

        // First set parks the worker inside publish.
        queued.publish(&set(1));
        while queued.dropped() == 0 {
            queued.publish(&set(2));
            std::thread::sleep(Duration::from_millis(1));
        }

        gate.wait();
        queued.close();
        assert!(queued.dropped() >= 1);
    }

    #[test]
    fn test_publish_after_close_is_ignored() {
        let sets = Arc::new(Mutex::new(Vec::new()));
        let queued = QueuedBroadcaster::new(
            Box::new(CollectingBroadcaster { sets: sets.clone() }),
            2,
        )
        .unwrap();
        queued.close();
        queued.publish(&set(1));
        assert!(sets.lock().is_empty());
    }
}
