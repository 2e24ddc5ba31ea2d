//! Telemetry forwarder sending raw batches over UDP.

use std::net::{SocketAddr, UdpSocket};

use tracing::info;

use super::error::NetworkError;
use super::udp::{bind_for, resolve, FailureTracker, TransportCounters};
use super::wire;
use crate::detection::RawBatch;
use crate::hub::TelemetryForwarder;

/// Sends every raw batch, tagged with its source index, to one UDP target.
///
/// Sends are fire-and-forget: failures are logged and counted, never retried.
pub struct NetworkSender {
    socket: UdpSocket,
    target: SocketAddr,
    endpoint: String,
    tracker: FailureTracker,
}

impl NetworkSender {
    /// Create a sender targeting `host:port`.
    pub fn new(host: &str, port: u16) -> Result<Self, NetworkError> {
        let target = resolve(host, port)?;
        let socket = bind_for(&target)?;
        info!(target = %target, "Network sender ready");
        Ok(Self {
            socket,
            target,
            endpoint: format!("sender {}", target),
            tracker: FailureTracker::new(),
        })
    }

    /// The resolved target address.
    pub fn target(&self) -> SocketAddr {
        self.target
    }

    /// Send one batch.
    pub fn send(&self, batch: &RawBatch) -> Result<(), NetworkError> {
        let bytes = wire::encode_batch(batch)?;
        self.socket.send_to(&bytes, self.target)?;
        Ok(())
    }

    /// Send counters.
    pub fn counters(&self) -> TransportCounters {
        self.tracker.counters()
    }
}

impl TelemetryForwarder for NetworkSender {
    fn forward(&self, batch: &RawBatch) {
        self.tracker.record(&self.endpoint, self.send(batch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::detection::{RawDetection, SourceIndex};

    #[test]
    fn test_forward_delivers_datagram() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener
            .set_read_timeout(Some(Duration::from_secs(2)))
            .unwrap();
        let port = listener.local_addr().unwrap().port();

        let sender = NetworkSender::new("127.0.0.1", port).unwrap();
        let batch = RawBatch::new(SourceIndex(1), vec![RawDetection::hand(0.1, 0.2, 3)]);
        sender.forward(&batch);

        let mut buf = [0u8; 2048];
        let (len, _) = listener.recv_from(&mut buf).unwrap();
        assert_eq!(wire::decode_batch(&buf[..len]).unwrap(), batch);
        assert_eq!(sender.counters().sent, 1);
    }

    #[test]
    fn test_unresolvable_host_is_an_error() {
        assert!(NetworkSender::new("host.invalid", 3334).is_err());
    }
}
