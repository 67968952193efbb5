//! Error types for the LISA sync simulator.
//!
//! Only structural failures are errors. A locator that cannot clear its
//! confidence threshold returns a normal [`MatchReport`](crate::locate::MatchReport)
//! with no payload offset instead.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Validation: percentages outside 0-100, impossible corruption requests
/// - Assembly: channel too small for sync field + payload
/// - Buffer I/O: short dump files and file system failures
#[derive(Debug, Error)]
pub enum Error {
    /// A percentage (corruption or confidence) outside 0-100
    #[error("percentage must be between 0 and 100, got {value}")]
    InvalidPercentage { value: i64 },

    /// More unique bit flips requested than the sync field has bits
    #[error("cannot corrupt {requested} unique bits: sync field only has {available}")]
    CorruptionExhausted { requested: usize, available: usize },

    /// Channel cannot hold the sync field and payload
    #[error("channel capacity {capacity} too small: need more than {required} bytes")]
    InvalidCapacity { capacity: usize, required: usize },

    /// Persisted buffer shorter than the agreed capacity
    #[error("truncated input: expected {expected} bytes, got {actual}")]
    TruncatedInput { expected: usize, actual: usize },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::InvalidCapacity {
            capacity: 40,
            required: 43,
        };
        assert_eq!(
            err.to_string(),
            "channel capacity 40 too small: need more than 43 bytes"
        );

        let err = Error::TruncatedInput {
            expected: 1024,
            actual: 10,
        };
        assert_eq!(err.to_string(), "truncated input: expected 1024 bytes, got 10");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
