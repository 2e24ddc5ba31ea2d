//! Network transport errors.

use thiserror::Error;

/// Errors raised by the UDP transports.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Socket I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host name did not resolve to any address.
    #[error("Could not resolve address '{0}'")]
    Resolve(String),

    /// A payload could not be serialized.
    #[error("Failed to encode datagram: {0}")]
    Encode(#[source] serde_json::Error),

    /// A received datagram was not valid.
    #[error("Malformed datagram: {0}")]
    Decode(#[source] serde_json::Error),

    /// An encoded payload does not fit in one datagram.
    #[error("Datagram too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_display() {
        let err = NetworkError::TooLarge {
            size: 70_000,
            max: 65_507,
        };
        assert_eq!(
            err.to_string(),
            "Datagram too large: 70000 bytes (max: 65507)"
        );
    }
}
