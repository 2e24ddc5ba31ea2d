//! UDP protocol broadcaster for track record sets.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::info;

use super::error::NetworkError;
use super::udp::{bind_for, resolve, FailureTracker, TransportCounters};
use super::wire::{self, TrackFrame};
use crate::hub::ProtocolBroadcaster;
use crate::track::{TrackRecord, TrackRecordSet};

/// Horizontal margins cropped from the tracked area before broadcast.
///
/// The visible band `[left, 1 - right]` is stretched back to `[0, 1]`, so a
/// receiver sees the full range even when the outer edges of the sensor
/// field are masked off.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Margins {
    pub left: f32,
    pub right: f32,
}

impl Margins {
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left: left.clamp(0.0, 1.0),
            right: right.clamp(0.0, 1.0),
        }
    }

    /// Whether any cropping applies.
    pub fn is_identity(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }

    /// Remap a normalized x coordinate into the cropped band, clamped to `[0, 1]`.
    pub fn apply(&self, x: f32) -> f32 {
        let span = 1.0 - self.left - self.right;
        if span <= f32::EPSILON {
            return x.clamp(0.0, 1.0);
        }
        ((x - self.left) / span).clamp(0.0, 1.0)
    }
}

/// Sends each published set as one [`TrackFrame`] datagram.
pub struct UdpTrackBroadcaster {
    socket: UdpSocket,
    target: SocketAddr,
    name: String,
    margins: Margins,
    seq: AtomicU64,
    tracker: FailureTracker,
}

impl UdpTrackBroadcaster {
    /// Create a broadcaster targeting `host:port`.
    pub fn new(host: &str, port: u16, margins: Margins) -> Result<Self, NetworkError> {
        let target = resolve(host, port)?;
        let socket = bind_for(&target)?;
        let name = format!("udp://{}:{}", host, port);
        info!(
            broadcaster = %name,
            left_margin = margins.left,
            right_margin = margins.right,
            "Track broadcaster ready"
        );
        Ok(Self {
            socket,
            target,
            name,
            margins,
            seq: AtomicU64::new(0),
            tracker: FailureTracker::new(),
        })
    }

    pub fn target(&self) -> SocketAddr {
        self.target
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Send counters.
    pub fn counters(&self) -> TransportCounters {
        self.tracker.counters()
    }

    fn frame(&self, set: &TrackRecordSet) -> TrackFrame {
        let tracks = set
            .iter()
            .map(|record| TrackRecord {
                x: self.margins.apply(record.x),
                ..*record
            })
            .collect();
        TrackFrame {
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
            tracks,
        }
    }

    fn send(&self, frame: &TrackFrame) -> Result<(), NetworkError> {
        let bytes = wire::encode_frame(frame)?;
        self.socket.send_to(&bytes, self.target)?;
        Ok(())
    }
}

impl ProtocolBroadcaster for UdpTrackBroadcaster {
    fn publish(&self, set: &TrackRecordSet) {
        let frame = self.frame(set);
        self.tracker.record(&self.name, self.send(&frame));
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    #[test]
    fn test_identity_margins() {
        let margins = Margins::default();
        assert!(margins.is_identity());
        assert_eq!(margins.apply(0.25), 0.25);
    }

    #[test]
    fn test_margins_stretch_band() {
        let margins = Margins::new(0.1, 0.1);
        assert!((margins.apply(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(margins.apply(0.1), 0.0);
        assert_eq!(margins.apply(0.05), 0.0);
        assert_eq!(margins.apply(0.95), 1.0);
    }

    #[test]
    fn test_publish_sends_frames_with_increasing_seq() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = listener.local_addr().unwrap().port();

        let broadcaster =
            UdpTrackBroadcaster::new("127.0.0.1", port, Margins::new(0.5, 0.0)).unwrap();
        assert_eq!(broadcaster.name(), format!("udp://127.0.0.1:{}", port));

        let set = TrackRecordSet::from(vec![TrackRecord::point(7, 0.75, 0.5)]);
        broadcaster.publish(&set);
        broadcaster.publish(&set);

        let mut buf = [0u8; 2048];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        let first = wire::decode_frame(&buf[..len]).unwrap();
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        let second = wire::decode_frame(&buf[..len]).unwrap();

        assert_eq!(first.seq, 0);
        assert_eq!(second.seq, 1);
        assert_eq!(first.tracks[0].id, 7);
        assert!((first.tracks[0].x - 0.5).abs() < 1e-6);
        assert_eq!(broadcaster.counters().sent, 2);
    }

    proptest! {
        #[test]
        fn prop_margins_stay_normalized(
            left in 0.0f32..1.0,
            right in 0.0f32..1.0,
            x in -1.0f32..2.0,
        ) {
            let out = Margins::new(left, right).apply(x);
            prop_assert!((0.0..=1.0).contains(&out));
        }
    }
}
