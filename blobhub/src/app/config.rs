//! Application configuration for [`HubApp`](super::HubApp).
//!
//! `AppConfig` is the resolved form of the INI file: everything the
//! bootstrap needs, already converted into component configuration types.

use std::time::Duration;

use crate::config::{BroadcastConfig, ConfigFile, ReceiverConfig, SenderConfig};
use crate::display::Viewport;
use crate::interpreter::{CorrelationConfig, GestureRadii};
use crate::source::SimulatedSourceConfig;

/// Top-level configuration passed to [`HubApp::start`](super::HubApp::start).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Telemetry forwarding target.
    pub sender: SenderConfig,

    /// Remote batch receiver.
    pub receiver: ReceiverConfig,

    /// Track record broadcasting.
    pub broadcast: BroadcastConfig,

    /// Number of simulated detection sources.
    pub simulated_sources: usize,

    /// Settings shared by every simulated source.
    pub simulated: SimulatedSourceConfig,

    /// Person tracking mode flag handed to every source at registration.
    pub person_tracking: bool,

    /// Correlation parameters. `source_slots == 0` means one slot per
    /// registered source.
    pub correlation: CorrelationConfig,

    /// Click and drag radii.
    pub gestures: GestureRadii,

    /// Initial display viewport.
    pub viewport: Viewport,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_config_file(&ConfigFile::default())
    }
}

impl AppConfig {
    /// Resolve an application config from the configuration file.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let tracking = &file.tracking;
        let correlation = CorrelationConfig {
            source_slots: tracking.source_slots,
            ..CorrelationConfig::default()
        }
        .with_point_radius(tracking.correlation_point)
        .with_region_radius(tracking.correlation_region)
        .with_region_correlation(tracking.region_correlation)
        .with_smoothing(tracking.smoothing);

        Self {
            sender: file.sender.clone(),
            receiver: file.receiver.clone(),
            broadcast: file.broadcast.clone(),
            simulated_sources: file.sources.simulated,
            simulated: SimulatedSourceConfig {
                tick: Duration::from_millis(file.sources.tick_ms.max(1)),
                blobs: file.sources.blobs_per_source,
                ..SimulatedSourceConfig::default()
            },
            person_tracking: tracking.person_tracking,
            correlation,
            gestures: GestureRadii::new(tracking.radius_click, tracking.radius_drag),
            viewport: Viewport::new(file.display.width, file.display.height),
        }
    }

    /// Override the number of simulated sources.
    pub fn with_simulated_sources(mut self, count: usize) -> Self {
        self.simulated_sources = count;
        self
    }

    /// Run without any network collaborators.
    pub fn offline(mut self) -> Self {
        self.sender.enabled = false;
        self.receiver.enabled = false;
        self.broadcast.enabled = false;
        self
    }
}
