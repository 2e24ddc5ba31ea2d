//! Socket helpers shared by the UDP endpoints.

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::{info, warn};

use super::error::NetworkError;

/// Resolve `host:port` to the first matching socket address.
pub(crate) fn resolve(host: &str, port: u16) -> Result<SocketAddr, NetworkError> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| NetworkError::Resolve(format!("{}:{}", host, port)))
}

/// Bind an ephemeral local socket of the same family as `target`.
pub(crate) fn bind_for(target: &SocketAddr) -> Result<UdpSocket, NetworkError> {
    let local = if target.is_ipv4() {
        "0.0.0.0:0"
    } else {
        "[::]:0"
    };
    Ok(UdpSocket::bind(local)?)
}

/// Point-in-time send counters of one endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportCounters {
    pub sent: u64,
    pub failed: u64,
}

/// Counts sends and logs failure streaks once instead of on every datagram.
#[derive(Debug, Default)]
pub struct FailureTracker {
    sent: AtomicU64,
    failed: AtomicU64,
    failing: AtomicBool,
}

impl FailureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one send to `endpoint`.
    pub fn record(&self, endpoint: &str, result: Result<(), NetworkError>) {
        match result {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                if self.failing.swap(false, Ordering::Relaxed) {
                    info!(endpoint, "Transport recovered");
                }
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                if !self.failing.swap(true, Ordering::Relaxed) {
                    warn!(endpoint, error = %e, "Transport send failed");
                }
            }
        }
    }

    /// Whether the most recent send failed.
    pub fn is_failing(&self) -> bool {
        self.failing.load(Ordering::Relaxed)
    }

    pub fn counters(&self) -> TransportCounters {
        TransportCounters {
            sent: self.sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
