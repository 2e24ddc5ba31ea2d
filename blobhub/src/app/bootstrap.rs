//! Application bootstrap implementation.

use std::sync::Arc;

use tracing::{info, warn};

use super::config::AppConfig;
use super::error::AppError;
use crate::display::DisplayBuffer;
use crate::hub::{
    EventHub, HubStatus, ProtocolBroadcaster, RawBatchSink, TelemetryForwarder, ViewportObserver,
};
use crate::interpreter::CorrelatingInterpreter;
use crate::network::{
    Margins, NetworkReceiver, NetworkSender, QueuedBroadcaster, UdpTrackBroadcaster,
};
use crate::source::SensorContext;

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "ON"
    } else {
        "OFF"
    }
}

/// The running application: sources, hub and display buffer.
///
/// Field order matters. The sensor context is dropped before the hub so no
/// source thread can call into a hub that is being torn down.
pub struct HubApp {
    context: SensorContext,
    hub: Arc<EventHub>,
    display: Arc<DisplayBuffer>,
}

impl HubApp {
    /// Build and start the application.
    ///
    /// Registration errors abort startup before any source thread runs.
    pub fn start(config: AppConfig) -> Result<Self, AppError> {
        let mut context =
            SensorContext::with_simulated(config.simulated_sources, config.simulated.clone());
        if config.receiver.enabled {
            let receiver = NetworkReceiver::bind(config.receiver.port)?;
            context.add(Box::new(receiver));
        }

        let forwarder = if config.sender.enabled {
            let sender = NetworkSender::new(&config.sender.host, config.sender.port)?;
            Some(Box::new(sender) as Box<dyn TelemetryForwarder>)
        } else {
            None
        };

        let broadcasters = Self::create_broadcasters(&config)?;

        let slots = match config.correlation.source_slots {
            0 => context.len(),
            n => n,
        };
        let correlation = config.correlation.clone().with_source_slots(slots);
        let engine = CorrelatingInterpreter::new(correlation).with_gesture_radii(config.gestures);

        let display = Arc::new(DisplayBuffer::with_viewport(config.viewport));

        let mut builder = EventHub::builder(Box::new(engine))
            .forwarder(forwarder)
            .display(Arc::clone(&display))
            .person_tracking(config.person_tracking)
            .receiver_enabled(config.receiver.enabled);
        for broadcaster in broadcasters {
            builder = builder.add_broadcaster(broadcaster);
        }
        builder.register_context(&context)?;

        let hub = Arc::new(builder.build());
        let sink: Arc<dyn RawBatchSink> = hub.clone();
        context.start_all(sink)?;

        Self::log_banner(&config, &hub, slots);

        Ok(Self {
            context,
            hub,
            display,
        })
    }

    fn create_broadcasters(
        config: &AppConfig,
    ) -> Result<Vec<Box<dyn ProtocolBroadcaster>>, AppError> {
        let broadcast = &config.broadcast;
        if !broadcast.enabled {
            return Ok(Vec::new());
        }

        let margins = Margins::new(broadcast.left_margin, broadcast.right_margin);
        let mut broadcasters: Vec<Box<dyn ProtocolBroadcaster>> = Vec::new();
        for target in &broadcast.targets {
            let udp = UdpTrackBroadcaster::new(&target.host, target.port, margins)?;
            let broadcaster: Box<dyn ProtocolBroadcaster> = if broadcast.queued {
                Box::new(QueuedBroadcaster::new(Box::new(udp), broadcast.queue_capacity)?)
            } else {
                Box::new(udp)
            };
            broadcasters.push(broadcaster);
        }
        if broadcasters.is_empty() {
            warn!("Broadcast enabled but no targets configured");
        }
        Ok(broadcasters)
    }

    fn log_banner(config: &AppConfig, hub: &EventHub, slots: usize) {
        info!("Configuration:");
        info!("  SENDER          : {}", on_off(config.sender.enabled));
        info!("  RECEIVER        : {}", on_off(config.receiver.enabled));
        info!("  BROADCAST       : {}", on_off(config.broadcast.enabled));
        info!("  PERSON TRACKING : {}", on_off(config.person_tracking));
        info!(
            sources = hub.source_count(),
            slots,
            broadcasters = ?hub.broadcaster_names(),
            "Detection sources started"
        );
        info!(
            correlation_point = config.correlation.point_radius,
            correlation_region = config.correlation.region_radius,
            region_correlation = config.correlation.region_correlation,
            radius_click = config.gestures.click,
            radius_drag = config.gestures.drag,
            "Tracking parameters"
        );
    }

    /// The event hub.
    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    /// The display buffer the render loop reads from.
    pub fn display(&self) -> &Arc<DisplayBuffer> {
        &self.display
    }

    /// The detection sources.
    pub fn context(&self) -> &SensorContext {
        &self.context
    }

    pub fn status(&self) -> HubStatus {
        self.hub.status()
    }

    /// Per-frame hook: polls every source.
    pub fn update(&self) {
        self.context.update_all();
    }

    /// Forward a window resize to the hub.
    pub fn resize(&self, width: f32, height: f32) {
        self.hub.on_viewport_resize(width, height);
    }

    /// Stop every source thread. The hub and collaborators are released when
    /// the app is dropped.
    pub fn shutdown(&mut self) {
        info!("Shutting down detection sources");
        self.context.shutdown();
        info!(
            batches = self.hub.metrics().snapshot().batches_received,
            "Shutdown complete"
        );
    }
}
