//! Setup-time construction of the [`EventHub`].

use std::sync::Arc;

use tracing::info;

use super::error::HubError;
use super::event_hub::EventHub;
use super::metrics::HubMetrics;
use super::registry::SourceRegistry;
use super::traits::{ProtocolBroadcaster, TelemetryForwarder};
use crate::detection::SourceIndex;
use crate::display::DisplayBuffer;
use crate::interpreter::InterpretationEngine;
use crate::source::{DetectionSource, SensorContext};

/// Builder collecting collaborators and source registrations.
///
/// Registration is only possible here. Once [`build`](Self::build) runs the
/// table is frozen for the lifetime of the hub.
pub struct HubBuilder {
    engine: Box<dyn InterpretationEngine>,
    forwarder: Option<Box<dyn TelemetryForwarder>>,
    broadcasters: Vec<Box<dyn ProtocolBroadcaster>>,
    display: Option<Arc<DisplayBuffer>>,
    registry: SourceRegistry,
    person_tracking: bool,
    receiver_enabled: bool,
}

impl HubBuilder {
    /// Start building a hub around `engine`.
    pub fn new(engine: Box<dyn InterpretationEngine>) -> Self {
        Self {
            engine,
            forwarder: None,
            broadcasters: Vec::new(),
            display: None,
            registry: SourceRegistry::new(),
            person_tracking: false,
            receiver_enabled: false,
        }
    }

    /// Set the telemetry forwarder. `None` disables forwarding.
    pub fn forwarder(mut self, forwarder: Option<Box<dyn TelemetryForwarder>>) -> Self {
        self.forwarder = forwarder;
        self
    }

    /// Append a protocol broadcaster. Broadcasters are published to in the
    /// order they are added.
    pub fn add_broadcaster(mut self, broadcaster: Box<dyn ProtocolBroadcaster>) -> Self {
        self.broadcasters.push(broadcaster);
        self
    }

    /// Use an existing display buffer instead of a default one.
    pub fn display(mut self, display: Arc<DisplayBuffer>) -> Self {
        self.display = Some(display);
        self
    }

    /// Person tracking flag handed to every source registered afterwards.
    pub fn person_tracking(mut self, enabled: bool) -> Self {
        self.person_tracking = enabled;
        self
    }

    /// Report a network receiver in the hub status.
    pub fn receiver_enabled(mut self, enabled: bool) -> Self {
        self.receiver_enabled = enabled;
        self
    }

    /// Bind `source` to `index` and pass it the person tracking flag.
    ///
    /// Must run before the source starts emitting. Index uniqueness is the
    /// caller's responsibility; violations are reported here.
    pub fn register_source(
        &mut self,
        source: &dyn DetectionSource,
        index: SourceIndex,
    ) -> Result<(), HubError> {
        self.registry.register(index, source.name())?;
        source.set_enable_person_tracking(self.person_tracking);
        info!(source = %index, name = %source.name(), "Source registered");
        Ok(())
    }

    /// Register every source of `context` under its context index.
    pub fn register_context(&mut self, context: &SensorContext) -> Result<(), HubError> {
        for (index, source) in context.sources() {
            self.register_source(source, index)?;
        }
        Ok(())
    }

    /// Number of sources registered so far.
    pub fn source_count(&self) -> usize {
        self.registry.len()
    }

    /// Freeze registrations and build the hub.
    pub fn build(self) -> EventHub {
        let display = self.display.unwrap_or_default();
        info!(
            sources = self.registry.len(),
            broadcasters = self.broadcasters.len(),
            telemetry = self.forwarder.is_some(),
            "Event hub built"
        );
        EventHub {
            registry: self.registry,
            forwarder: self.forwarder,
            engine: self.engine,
            broadcasters: self.broadcasters,
            display,
            metrics: HubMetrics::new(),
            person_tracking: self.person_tracking,
            receiver_enabled: self.receiver_enabled,
        }
    }
}
