//! Explicitly owned sensor context.

use std::sync::Arc;

use tracing::info;

use super::{DetectionSource, SimulatedSource, SimulatedSourceConfig, SourceError};
use crate::detection::SourceIndex;
use crate::hub::RawBatchSink;

/// Owns every detection source for the lifetime of the application.
///
/// The source at position `i` is registered and started with
/// `SourceIndex(i)`. Dropping the context stops all sources.
pub struct SensorContext {
    sources: Vec<Box<dyn DetectionSource>>,
    started: bool,
}

impl SensorContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            started: false,
        }
    }

    /// Create a context with `count` simulated sources.
    ///
    /// Each source gets a distinct seed derived from `config.seed`.
    pub fn with_simulated(count: usize, config: SimulatedSourceConfig) -> Self {
        let mut context = Self::new();
        for i in 0..count {
            let source_config = SimulatedSourceConfig {
                seed: config.seed.wrapping_add(i as u64),
                ..config.clone()
            };
            context.add(Box::new(SimulatedSource::new(
                format!("sim-{}", i),
                source_config,
            )));
        }
        context
    }

    /// Add a source and return the index it will be registered under.
    pub fn add(&mut self, source: Box<dyn DetectionSource>) -> SourceIndex {
        let index = SourceIndex(self.sources.len());
        self.sources.push(source);
        index
    }

    /// Sources paired with their indices.
    pub fn sources(&self) -> impl Iterator<Item = (SourceIndex, &dyn DetectionSource)> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| (SourceIndex(i), source.as_ref()))
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the context holds no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Whether `start_all` has run.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Start every source, pushing into `sink`.
    ///
    /// On failure the sources started so far are stopped again.
    pub fn start_all(&mut self, sink: Arc<dyn RawBatchSink>) -> Result<(), SourceError> {
        for (i, source) in self.sources.iter().enumerate() {
            if let Err(e) = source.start(SourceIndex(i), Arc::clone(&sink)) {
                for started in &self.sources[..i] {
                    started.stop();
                }
                return Err(e);
            }
        }
        self.started = true;
        info!(sources = self.sources.len(), "Sensor context started");
        Ok(())
    }

    /// Run periodic housekeeping on every source.
    pub fn update_all(&self) {
        for source in &self.sources {
            source.update();
        }
    }

    /// Number of sources whose thread is running.
    pub fn running_count(&self) -> usize {
        self.sources.iter().filter(|s| s.is_running()).count()
    }

    /// Stop every source, most recently added first.
    pub fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        for source in self.sources.iter().rev() {
            source.stop();
        }
        self.started = false;
        info!("Sensor context shut down");
    }
}

impl Default for SensorContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SensorContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::detection::RawBatch;

    #[derive(Default)]
    struct NullSink {
        calls: AtomicUsize,
    }

    impl RawBatchSink for NullSink {
        fn on_raw_batch(&self, _batch: &RawBatch) {
            self.calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn config() -> SimulatedSourceConfig {
        SimulatedSourceConfig {
            tick: Duration::from_millis(1),
            blobs: 1,
            seed: 7,
        }
    }

    #[test]
    fn test_simulated_context_indices() {
        let context = SensorContext::with_simulated(3, config());
        let indices: Vec<SourceIndex> = context.sources().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![SourceIndex(0), SourceIndex(1), SourceIndex(2)]);
        let names: Vec<String> = context.sources().map(|(_, s)| s.name()).collect();
        assert_eq!(names, vec!["sim-0", "sim-1", "sim-2"]);
    }

    #[test]
    fn test_start_update_shutdown() {
        let sink = Arc::new(NullSink::default());
        let mut context = SensorContext::with_simulated(2, config());
        context.start_all(sink.clone()).unwrap();
        assert!(context.is_started());

        std::thread::sleep(Duration::from_millis(20));
        context.update_all();
        context.shutdown();

        assert_eq!(context.running_count(), 0);
        assert!(sink.calls.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn test_shutdown_without_start_is_noop() {
        let mut context = SensorContext::with_simulated(1, config());
        context.shutdown();
        assert!(!context.is_started());
    }
}
