//! Application error types.

use thiserror::Error;

use crate::config::ConfigError;
use crate::hub::HubError;
use crate::network::NetworkError;
use crate::source::SourceError;

/// Errors that abort application startup.
#[derive(Debug, Error)]
pub enum AppError {
    /// A source could not be registered with the hub.
    #[error("source registration failed: {0}")]
    Registration(#[from] HubError),

    /// A detection source failed to start.
    #[error("failed to start detection sources: {0}")]
    Source(#[from] SourceError),

    /// A network collaborator could not be created.
    #[error("network setup failed: {0}")]
    Network(#[from] NetworkError),

    /// The configuration file could not be read.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
