//! Nearest-neighbour correlating interpretation engine.
//!
//! # Algorithm
//!
//! For each batch from source `s`:
//!
//! 1. Map every detection into global normalized space.
//! 2. Associate it greedily, in detection order, with the nearest unmatched
//!    live track of the same source and class inside the class radius.
//! 3. Matched tracks move towards the raw position by the smoothing factor;
//!    unmatched detections open tracks with fresh identities.
//! 4. Tracks of source `s` left unmatched are retired.
//!
//! The output is every live track across all sources, ordered by identity.

use parking_lot::Mutex;
use tracing::{debug, info};

use super::config::{CorrelationConfig, GestureRadii};
use super::InterpretationEngine;
use crate::detection::{RawBatch, RawDetection, SourceIndex};
use crate::track::{TrackClass, TrackRecord, TrackRecordSet};

#[derive(Debug, Clone, Copy)]
struct LiveTrack {
    id: u32,
    source: SourceIndex,
    x: f32,
    y: f32,
    class: TrackClass,
}

impl LiveTrack {
    fn record(&self) -> TrackRecord {
        TrackRecord::new(self.id, self.x, self.y, self.class)
    }
}

struct TrackState {
    tracks: Vec<LiveTrack>,
    next_id: u32,
}

impl TrackState {
    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }
}

fn euclidean(track: &LiveTrack, x: f32, y: f32) -> f32 {
    ((track.x - x).powi(2) + (track.y - y).powi(2)).sqrt()
}

fn horizontal(track: &LiveTrack, x: f32, _y: f32) -> f32 {
    (track.x - x).abs()
}

/// Correlating engine with internally serialized track state.
pub struct CorrelatingInterpreter {
    config: CorrelationConfig,
    gestures: GestureRadii,
    state: Mutex<TrackState>,
}

impl CorrelatingInterpreter {
    /// Create an engine with the given correlation parameters.
    pub fn new(config: CorrelationConfig) -> Self {
        info!(
            point_radius = config.point_radius,
            region_radius = config.region_radius,
            region_correlation = config.region_correlation,
            smoothing = config.smoothing,
            source_slots = config.source_slots,
            "Correlating interpreter configured"
        );
        Self {
            config,
            gestures: GestureRadii::default(),
            state: Mutex::new(TrackState {
                tracks: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Create an engine with default parameters.
    pub fn with_defaults() -> Self {
        Self::new(CorrelationConfig::default())
    }

    /// Set the gesture radii carried for the click and drag recognizers.
    pub fn with_gesture_radii(mut self, gestures: GestureRadii) -> Self {
        info!(
            click = gestures.click,
            drag = gestures.drag,
            "Gesture radii set"
        );
        self.gestures = gestures;
        self
    }

    /// Correlation parameters.
    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Gesture radii.
    pub fn gesture_radii(&self) -> GestureRadii {
        self.gestures
    }

    /// Number of live tracks across all sources.
    pub fn live_tracks(&self) -> usize {
        self.state.lock().tracks.len()
    }

    /// Index into `candidates` of the nearest match for a detection at `(x, y)`.
    fn find_match(
        &self,
        candidates: &[LiveTrack],
        class: TrackClass,
        x: f32,
        y: f32,
    ) -> Option<usize> {
        let radius = match class {
            TrackClass::Point => self.config.point_radius,
            TrackClass::Area if self.config.region_correlation => self.config.region_radius,
            TrackClass::Area => return None,
        };
        let distance: fn(&LiveTrack, f32, f32) -> f32 = match class {
            TrackClass::Point => euclidean,
            TrackClass::Area => horizontal,
        };

        candidates
            .iter()
            .enumerate()
            .filter(|(_, track)| track.class == class)
            .map(|(i, track)| (i, distance(track, x, y)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn correlate(
        &self,
        state: &mut TrackState,
        source: SourceIndex,
        detections: &[RawDetection],
    ) {
        let (mut own, mut next): (Vec<LiveTrack>, Vec<LiveTrack>) = state
            .tracks
            .iter()
            .copied()
            .partition(|track| track.source == source);

        for detection in detections {
            let class = detection.hint.track_class();
            let (x, y) = self.config.to_global(source.get(), detection.x, detection.y);

            let track = match self.find_match(&own, class, x, y) {
                Some(pos) => {
                    let mut track = own.swap_remove(pos);
                    track.x += self.config.smoothing * (x - track.x);
                    track.y += self.config.smoothing * (y - track.y);
                    track
                }
                None => LiveTrack {
                    id: state.allocate_id(),
                    source,
                    x,
                    y,
                    class,
                },
            };
            next.push(track);
        }

        if !own.is_empty() {
            debug!(source = %source, retired = own.len(), "Tracks retired");
        }

        next.sort_by_key(|track| track.id);
        state.tracks = next;
    }
}

impl InterpretationEngine for CorrelatingInterpreter {
    fn ingest(&self, batch: &RawBatch) -> Option<TrackRecordSet> {
        let mut state = self.state.lock();
        self.correlate(&mut state, batch.source, &batch.detections);
        Some(state.tracks.iter().map(LiveTrack::record).collect())
    }
}
