//! BlobHub - event distribution hub for multi-sensor blob tracking
//!
//! This library receives raw detection batches from several independent
//! sensing sources, forwards them to an optional telemetry sink, drives an
//! interpretation engine that turns them into identity-stable track records,
//! and fans those records out to protocol broadcasters and a display buffer
//! read by a render loop.
//!
//! # Data Flow
//!
//! ```text
//! DetectionSource ──► EventHub ──► TelemetryForwarder (optional)
//!   (own thread)         │
//!                        └──────► InterpretationEngine
//!                                        │
//!                 EventHub ◄─────────────┘ TrackRecordSet
//!                    │
//!                    ├──► ProtocolBroadcaster × N (registration order)
//!                    └──► DisplayBuffer ◄── render loop (own thread)
//! ```
//!
//! Dispatch is a single synchronous call chain on the producing source's
//! thread. The hub owns no threads and no queue.

pub mod app;
pub mod config;
pub mod detection;
pub mod display;
pub mod hub;
pub mod interpreter;
pub mod log;
pub mod network;
pub mod source;
pub mod track;

/// Crate version, as reported in startup logs and the CLI banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
