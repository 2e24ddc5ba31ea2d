//! Hub setup errors.

use thiserror::Error;

use crate::detection::SourceIndex;

/// Errors raised while wiring sources into the hub.
///
/// These are programming errors in the setup path. The application treats
/// them as fatal and aborts before any source starts emitting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HubError {
    /// The index is already bound to another source.
    #[error("Source index {index} is already registered to '{existing}'")]
    DuplicateSource { index: SourceIndex, existing: String },

    /// The index does not fit in the registration table.
    #[error("Source index {index} is out of range (max: {max})")]
    IndexOutOfRange { index: SourceIndex, max: usize },
}
