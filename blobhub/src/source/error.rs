//! Detection source errors.

use thiserror::Error;

/// Errors starting a detection source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source was already started.
    #[error("Source '{0}' is already started")]
    AlreadyStarted(String),

    /// The source thread could not be spawned.
    #[error("Failed to spawn source thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// I/O error preparing the source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
