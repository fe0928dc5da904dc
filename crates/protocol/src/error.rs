//! Codec error types

use thiserror::Error;

/// Wire-codec errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Buffer shorter than the fixed record layout
    #[error("Malformed header: expected {expected} bytes, got {actual}")]
    MalformedHeader { expected: usize, actual: usize },

    /// I/O error while reading or writing a record
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for codec results
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_header_display() {
        let err = ProtocolError::MalformedHeader {
            expected: 312,
            actual: 40,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Malformed header"));
        assert!(msg.contains("312"));
        assert!(msg.contains("40"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err = ProtocolError::from(io);
        assert!(matches!(err, ProtocolError::Io(_)));
        assert!(format!("{}", err).contains("short read"));
    }
}
