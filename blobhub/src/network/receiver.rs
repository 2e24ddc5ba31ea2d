//! Detection source fed by raw batches received over UDP.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::NetworkError;
use super::wire::{self, MAX_DATAGRAM_SIZE};
use crate::detection::SourceIndex;
use crate::hub::RawBatchSink;
use crate::source::{DetectionSource, SourceError};

/// How often the receive loop checks for cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Receives raw batches from a remote [`NetworkSender`](super::NetworkSender)
/// and re-emits them under its own registered index.
///
/// The remote source index is discarded: to the hub, the receiver is one
/// more detection source.
pub struct NetworkReceiver {
    socket: UdpSocket,
    local_addr: SocketAddr,
    person_tracking: AtomicBool,
    received: Arc<AtomicU64>,
    malformed: Arc<AtomicU64>,
    cancellation: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl NetworkReceiver {
    /// Bind a receiver on all interfaces at `port`. Port 0 picks a free port.
    pub fn bind(port: u16) -> Result<Self, NetworkError> {
        Self::bind_addr(SocketAddr::from(([0, 0, 0, 0], port)))
    }

    /// Bind a receiver at `addr`.
    pub fn bind_addr(addr: SocketAddr) -> Result<Self, NetworkError> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(POLL_INTERVAL))?;
        let local_addr = socket.local_addr()?;
        info!(addr = %local_addr, "Network receiver bound");
        Ok(Self {
            socket,
            local_addr,
            person_tracking: AtomicBool::new(false),
            received: Arc::new(AtomicU64::new(0)),
            malformed: Arc::new(AtomicU64::new(0)),
            cancellation: CancellationToken::new(),
            handle: Mutex::new(None),
        })
    }

    /// The bound local address.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Number of batches received and re-emitted.
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Number of datagrams that failed to decode.
    pub fn malformed(&self) -> u64 {
        self.malformed.load(Ordering::Relaxed)
    }
}

impl DetectionSource for NetworkReceiver {
    fn name(&self) -> String {
        format!("receiver:{}", self.local_addr.port())
    }

    fn set_enable_person_tracking(&self, enabled: bool) {
        self.person_tracking.store(enabled, Ordering::Relaxed);
    }

    fn person_tracking(&self) -> bool {
        self.person_tracking.load(Ordering::Relaxed)
    }

    fn start(&self, index: SourceIndex, sink: Arc<dyn RawBatchSink>) -> Result<(), SourceError> {
        let mut handle = self.handle.lock();
        if handle.is_some() || self.cancellation.is_cancelled() {
            return Err(SourceError::AlreadyStarted(self.name()));
        }

        let socket = self.socket.try_clone()?;
        let cancellation = self.cancellation.clone();
        let received = Arc::clone(&self.received);
        let malformed = Arc::clone(&self.malformed);

        let thread = std::thread::Builder::new()
            .name(format!("receiver-{}", self.local_addr.port()))
            .spawn(move || {
                let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
                while !cancellation.is_cancelled() {
                    let (len, peer) = match socket.recv_from(&mut buf) {
                        Ok(result) => result,
                        Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                            continue;
                        }
                        Err(e) => {
                            warn!(error = %e, "Network receiver stopped on socket error");
                            break;
                        }
                    };

                    match wire::decode_batch(&buf[..len]) {
                        Ok(mut batch) => {
                            batch.source = index;
                            received.fetch_add(1, Ordering::Relaxed);
                            sink.on_raw_batch(&batch);
                        }
                        Err(e) => {
                            malformed.fetch_add(1, Ordering::Relaxed);
                            debug!(peer = %peer, error = %e, "Ignoring malformed datagram");
                        }
                    }
                }
                debug!(source = %index, "Network receiver stopped");
            })
            .map_err(SourceError::Spawn)?;

        info!(source = %index, addr = %self.local_addr, "Network receiver started");
        *handle = Some(thread);
        Ok(())
    }

    fn stop(&self) {
        self.cancellation.cancel();
        if let Some(thread) = self.handle.lock().take() {
            if thread.join().is_err() {
                warn!("Network receiver thread panicked");
            }
        }
    }

    fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map(|thread| !thread.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for NetworkReceiver {
    fn drop(&mut self) {
        self.stop();
    }
}
