//! JSON datagram formats.
//!
//! Raw batches travel as the serialized [`RawBatch`]:
//!
//! ```text
//! {"source":0,"detections":[{"x":0.5,"y":0.5,"id":1,"hint":"hand"}]}
//! ```
//!
//! Track record sets travel as a [`TrackFrame`]:
//!
//! ```text
//! {"seq":42,"tracks":[{"id":7,"x":0.5,"y":0.5,"class":"point"}]}
//! ```

use serde::{Deserialize, Serialize};

use super::error::NetworkError;
use crate::detection::RawBatch;
use crate::track::TrackRecord;

/// Largest UDP payload over IPv4.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// One broadcast frame carrying a full track record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFrame {
    /// Frame sequence number, increasing by one per publish.
    pub seq: u64,
    /// The complete set, after margin remapping.
    pub tracks: Vec<TrackRecord>,
}

fn check_size(bytes: Vec<u8>) -> Result<Vec<u8>, NetworkError> {
    if bytes.len() > MAX_DATAGRAM_SIZE {
        return Err(NetworkError::TooLarge {
            size: bytes.len(),
            max: MAX_DATAGRAM_SIZE,
        });
    }
    Ok(bytes)
}

/// Encode a raw batch as one datagram.
pub fn encode_batch(batch: &RawBatch) -> Result<Vec<u8>, NetworkError> {
    check_size(serde_json::to_vec(batch).map_err(NetworkError::Encode)?)
}

/// Decode a raw batch datagram.
pub fn decode_batch(bytes: &[u8]) -> Result<RawBatch, NetworkError> {
    serde_json::from_slice(bytes).map_err(NetworkError::Decode)
}

/// Encode a track frame as one datagram.
pub fn encode_frame(frame: &TrackFrame) -> Result<Vec<u8>, NetworkError> {
    check_size(serde_json::to_vec(frame).map_err(NetworkError::Encode)?)
}

/// Decode a track frame datagram.
pub fn decode_frame(bytes: &[u8]) -> Result<TrackFrame, NetworkError> {
    serde_json::from_slice(bytes).map_err(NetworkError::Decode)
}
