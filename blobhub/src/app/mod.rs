//! Application bootstrap and lifecycle management.
//!
//! [`HubApp`] wires detection sources, collaborators and the event hub in
//! the order the hub requires, and tears them down in reverse.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           HubApp                             │
//! │                                                              │
//! │  1. SensorContext ───────── simulated sources + receiver     │
//! │  2. Collaborators ───────── NetworkSender, broadcasters      │
//! │  3. CorrelatingInterpreter  slots = registered sources       │
//! │  4. HubBuilder ─────────── register_context (fatal on error) │
//! │  5. Arc<EventHub> ──────── context.start_all(hub)            │
//! │                                                              │
//! │  shutdown: stop sources ──► drop hub ──► drop collaborators  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use blobhub::app::{AppConfig, HubApp};
//! use blobhub::config::ConfigFile;
//!
//! let config = AppConfig::from_config_file(&ConfigFile::load_default()?);
//! let mut app = HubApp::start(config)?;
//!
//! app.display().with_snapshot(|snapshot| draw(snapshot));
//!
//! app.shutdown();
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::HubApp;
pub use config::AppConfig;
pub use error::AppError;
