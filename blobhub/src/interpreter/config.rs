//! Correlation parameters for the interpretation engine.

/// Default point/point correlation radius in normalized units.
pub const DEFAULT_POINT_RADIUS: f32 = 0.05;

/// Default point/region correlation radius in normalized units.
pub const DEFAULT_REGION_RADIUS: f32 = 0.1;

/// Default smoothing factor.
///
/// Fraction of the distance to the new raw position a matched track moves
/// per tick (0.0-1.0, 1.0 disables smoothing).
pub const DEFAULT_SMOOTHING: f32 = 0.5;

/// Correlation parameters, set once at construction from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationConfig {
    /// Maximum distance at which a point detection continues a point track.
    pub point_radius: f32,

    /// Maximum horizontal distance at which an area detection continues an
    /// area track.
    pub region_radius: f32,

    /// Whether area detections are correlated at all.
    ///
    /// When disabled every area detection opens a fresh track.
    pub region_correlation: bool,

    /// Smoothing factor applied to matched tracks.
    pub smoothing: f32,

    /// Number of horizontal sensor slots.
    ///
    /// Source `i` covers `[s/n, (s+1)/n]` of the normalized width where
    /// `s = i % n`. One slot means sensor-local and global coordinates agree.
    pub source_slots: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            point_radius: DEFAULT_POINT_RADIUS,
            region_radius: DEFAULT_REGION_RADIUS,
            region_correlation: true,
            smoothing: DEFAULT_SMOOTHING,
            source_slots: 1,
        }
    }
}

impl CorrelationConfig {
    /// Set the point/point correlation radius.
    pub fn with_point_radius(mut self, radius: f32) -> Self {
        self.point_radius = radius;
        self
    }

    /// Set the point/region correlation radius.
    pub fn with_region_radius(mut self, radius: f32) -> Self {
        self.region_radius = radius;
        self
    }

    /// Enable or disable region-level correlation.
    pub fn with_region_correlation(mut self, enabled: bool) -> Self {
        self.region_correlation = enabled;
        self
    }

    /// Set the smoothing factor, clamped to 0.0-1.0.
    pub fn with_smoothing(mut self, smoothing: f32) -> Self {
        self.smoothing = smoothing.clamp(0.0, 1.0);
        self
    }

    /// Set the number of horizontal sensor slots (at least one).
    pub fn with_source_slots(mut self, slots: usize) -> Self {
        self.source_slots = slots.max(1);
        self
    }

    /// Map a sensor-local position into global normalized space.
    pub fn to_global(&self, source: usize, x: f32, y: f32) -> (f32, f32) {
        let slots = self.source_slots.max(1);
        let slot = (source % slots) as f32;
        let gx = (slot + x.clamp(0.0, 1.0)) / slots as f32;
        (gx, y.clamp(0.0, 1.0))
    }
}

/// Interaction radii for the click and drag gesture recognizers.
///
/// Carried through to the engine unchanged; no gesture recognition happens
/// in this crate. Zero disables the corresponding gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GestureRadii {
    pub click: f32,
    pub drag: f32,
}

impl GestureRadii {
    pub fn new(click: f32, drag: f32) -> Self {
        Self { click, drag }
    }
}
