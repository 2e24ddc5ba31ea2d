//! Synthetic detection source for demos and tests.
//!
//! Emits a batch of wandering hand blobs every tick. When person tracking is
//! enabled one additional person blob drifts slowly across the sensor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{DetectionSource, SourceError};
use crate::detection::{RawBatch, RawDetection, SourceIndex};
use crate::hub::RawBatchSink;

/// Sensor-local identity of the simulated person blob.
pub const PERSON_BLOB_ID: u32 = 100;

/// Maximum per-tick movement of a hand blob in normalized units.
const MAX_STEP: f32 = 0.01;

/// Per-tick movement of the person blob in normalized units.
const PERSON_STEP: f32 = 0.002;

/// Configuration for a simulated source.
#[derive(Debug, Clone)]
pub struct SimulatedSourceConfig {
    /// Interval between batches.
    pub tick: Duration,
    /// Number of hand blobs per batch.
    pub blobs: usize,
    /// Seed for the random walk.
    pub seed: u64,
}

impl Default for SimulatedSourceConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(33),
            blobs: 3,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Walker {
    x: f32,
    y: f32,
    dx: f32,
    dy: f32,
}

impl Walker {
    fn random(rng: &mut StdRng, max_step: f32) -> Self {
        Self {
            x: rng.random_range(0.0..1.0),
            y: rng.random_range(0.0..1.0),
            dx: rng.random_range(-max_step..max_step),
            dy: rng.random_range(-max_step..max_step),
        }
    }

    fn step(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
        if !(0.0..=1.0).contains(&self.x) {
            self.dx = -self.dx;
            self.x = self.x.clamp(0.0, 1.0);
        }
        if !(0.0..=1.0).contains(&self.y) {
            self.dy = -self.dy;
            self.y = self.y.clamp(0.0, 1.0);
        }
    }
}

/// Deterministic random-walk scene shared by the source thread.
struct Scene {
    hands: Vec<Walker>,
    person: Walker,
}

impl Scene {
    fn new(config: &SimulatedSourceConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let hands = (0..config.blobs)
            .map(|_| Walker::random(&mut rng, MAX_STEP))
            .collect();
        let person = Walker {
            x: rng.random_range(0.0..1.0),
            y: 0.5,
            dx: PERSON_STEP,
            dy: 0.0,
        };
        Self { hands, person }
    }

    fn tick(&mut self, index: SourceIndex, person_tracking: bool) -> RawBatch {
        let mut detections = Vec::with_capacity(self.hands.len() + 1);
        for (i, hand) in self.hands.iter_mut().enumerate() {
            hand.step();
            detections.push(RawDetection::hand(hand.x, hand.y, i as u32 + 1));
        }
        if person_tracking {
            self.person.step();
            detections.push(RawDetection::person(
                self.person.x,
                self.person.y,
                PERSON_BLOB_ID,
            ));
        }
        RawBatch::new(index, detections)
    }
}

/// A detection source that synthesizes wandering blobs on its own thread.
pub struct SimulatedSource {
    name: String,
    config: SimulatedSourceConfig,
    person_tracking: Arc<AtomicBool>,
    cancellation: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SimulatedSource {
    /// Create a stopped source.
    pub fn new(name: impl Into<String>, config: SimulatedSourceConfig) -> Self {
        Self {
            name: name.into(),
            config,
            person_tracking: Arc::new(AtomicBool::new(false)),
            cancellation: CancellationToken::new(),
            handle: Mutex::new(None),
        }
    }

    /// Source configuration.
    pub fn config(&self) -> &SimulatedSourceConfig {
        &self.config
    }
}

impl DetectionSource for SimulatedSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn set_enable_person_tracking(&self, enabled: bool) {
        self.person_tracking.store(enabled, Ordering::Relaxed);
    }

    fn person_tracking(&self) -> bool {
        self.person_tracking.load(Ordering::Relaxed)
    }

    fn start(&self, index: SourceIndex, sink: Arc<dyn RawBatchSink>) -> Result<(), SourceError> {
        let mut handle = self.handle.lock();
        if handle.is_some() || self.cancellation.is_cancelled() {
            return Err(SourceError::AlreadyStarted(self.name.clone()));
        }

        let mut scene = Scene::new(&self.config);
        let tick = self.config.tick;
        let person_tracking = Arc::clone(&self.person_tracking);
        let cancellation = self.cancellation.clone();
        let name = self.name.clone();

        let thread = std::thread::Builder::new()
            .name(format!("source-{}", self.name))
            .spawn(move || {
                debug!(source = %index, name = %name, "Simulated source running");
                while !cancellation.is_cancelled() {
                    let batch = scene.tick(index, person_tracking.load(Ordering::Relaxed));
                    sink.on_raw_batch(&batch);
                    std::thread::sleep(tick);
                }
                debug!(source = %index, name = %name, "Simulated source stopped");
            })
            .map_err(SourceError::Spawn)?;

        info!(
            source = %index,
            name = %self.name,
            blobs = self.config.blobs,
            tick_ms = tick.as_millis() as u64,
            "Simulated source started"
        );
        *handle = Some(thread);
        Ok(())
    }

    fn stop(&self) {
        self.cancellation.cancel();
        if let Some(thread) = self.handle.lock().take() {
            if thread.join().is_err() {
                warn!(name = %self.name, "Simulated source thread panicked");
            }
        }
    }

    fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map(|thread| !thread.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SimulatedSource {
    fn drop(&mut self) {
        self.stop();
    }
}
