//! Terminal UI for BlobHub.
//!
//! # Module Structure
//!
//! - `dashboard` - screen layout and non-TUI status output
//! - `widgets` - tracking canvas and status panel

pub mod dashboard;
pub mod widgets;

pub use dashboard::Dashboard;
