//! Detection sources and the context that owns them.
//!
//! Every [`DetectionSource`] runs its own thread and pushes batches into a
//! [`RawBatchSink`](crate::hub::RawBatchSink) (normally the hub). The
//! [`SensorContext`] is the explicitly owned replacement for a process-wide
//! device registry: it is created before the hub, lends its sources to the
//! hub builder for registration, starts them once the hub exists, and stops
//! them before the hub is dropped.
//!
//! # Lifecycle
//!
//! ```text
//! SensorContext::new ─► HubBuilder::register_context ─► build hub
//!        │                                                  │
//!        └──────────── start_all(Arc<hub>) ◄────────────────┘
//!                           │
//!                     update_all (render loop)
//!                           │
//!                      shutdown ─► drop hub
//! ```

mod context;
mod error;
mod simulated;

pub use context::SensorContext;
pub use error::SourceError;
pub use simulated::{SimulatedSource, SimulatedSourceConfig, PERSON_BLOB_ID};

use std::sync::Arc;

use crate::detection::SourceIndex;
use crate::hub::RawBatchSink;

/// A producer of raw detection batches running on its own thread.
///
/// Methods take `&self`; implementations keep their thread handle and flags
/// behind interior mutability so the context can lend them out by reference.
pub trait DetectionSource: Send + Sync {
    /// Source name for logs and status output.
    fn name(&self) -> String;

    /// Enable or disable the auxiliary person tracking mode.
    ///
    /// Set during setup, before `start`.
    fn set_enable_person_tracking(&self, enabled: bool);

    /// Whether person tracking is enabled.
    fn person_tracking(&self) -> bool;

    /// Start emitting batches tagged with `index` into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::AlreadyStarted`] on a second call,
    /// [`SourceError::Spawn`] if the thread cannot be created, and
    /// [`SourceError::Io`] if the source's own resources fail.
    fn start(&self, index: SourceIndex, sink: Arc<dyn RawBatchSink>) -> Result<(), SourceError>;

    /// Periodic housekeeping, called from the render loop.
    fn update(&self) {}

    /// Stop emitting and join the source thread. Idempotent.
    fn stop(&self);

    /// Whether the source thread is running.
    fn is_running(&self) -> bool;
}
