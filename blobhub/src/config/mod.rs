//! INI configuration.
//!
//! The configuration lives at `~/.blobhub/config.ini` unless a path is
//! given explicitly. A missing file yields the defaults; unknown keys are
//! ignored.
//!
//! ```ini
//! [sender]
//! enabled = false
//! host = 127.0.0.1
//! port = 3334
//!
//! [receiver]
//! enabled = false
//! port = 3334
//!
//! [broadcast]
//! enabled = true
//! targets = 127.0.0.1:3333
//! left_margin = 0
//! right_margin = 0
//! queued = false
//! queue_capacity = 4
//!
//! [tracking]
//! person_tracking = false
//! correlation_point = 0.05
//! correlation_region = 0.1
//! region_correlation = true
//! smoothing = 0.5
//! radius_click = 0
//! radius_drag = 0
//! source_slots = 0
//!
//! [sources]
//! simulated = 2
//! tick_ms = 33
//! blobs_per_source = 3
//!
//! [display]
//! width = 1920
//! height = 480
//!
//! [logging]
//! level = info
//! directory = ~/.blobhub/logs
//! ```

mod error;
mod file;

pub use error::ConfigError;
pub use file::{
    config_directory, config_file_path, BroadcastConfig, BroadcastTarget, ConfigFile,
    DisplayConfig, LoggingConfig, ReceiverConfig, SenderConfig, SourcesConfig, TrackingConfig,
};
