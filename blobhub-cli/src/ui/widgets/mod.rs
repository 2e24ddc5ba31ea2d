//! Dashboard widgets for the TUI.

mod status;
mod tracking;

pub use status::StatusWidget;
pub use tracking::TrackingView;
