//! UDP transports for raw batches and track records.
//!
//! - [`NetworkSender`] - telemetry forwarder sending raw batches to a remote
//!   host
//! - [`NetworkReceiver`] - detection source re-emitting raw batches received
//!   from a remote sender
//! - [`UdpTrackBroadcaster`] - protocol broadcaster sending every track
//!   record set to one target
//! - [`QueuedBroadcaster`] - moves any broadcaster onto its own thread behind
//!   a bounded queue
//!
//! All payloads are JSON datagrams (see [`wire`]).
//!
//! # Failure Handling
//!
//! Transport errors never reach the hub. Each endpoint logs the first failure
//! of a streak at `warn`, counts every failure, and logs recovery at `info`.

mod broadcaster;
mod error;
mod queued;
mod receiver;
mod sender;
mod udp;
pub mod wire;

pub use broadcaster::{Margins, UdpTrackBroadcaster};
pub use error::NetworkError;
pub use queued::{QueuedBroadcaster, DEFAULT_QUEUE_CAPACITY};
pub use receiver::NetworkReceiver;
pub use sender::NetworkSender;
pub use udp::{FailureTracker, TransportCounters};
