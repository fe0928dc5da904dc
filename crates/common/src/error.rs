//! Common error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to connect to {host}:{port}: {source}")]
    Connect {
        host: String,
        port: u16,
        source: std::io::Error,
    },

    #[error("Transport write failed: {0}")]
    TransportWrite(std::io::Error),

    #[error("Transport read failed: {0}")]
    TransportRead(std::io::Error),

    #[error("Malformed reply: {0}")]
    Malformed(#[from] protocol::ProtocolError),

    #[error("Local enumeration failed: {0}")]
    LocalEnumeration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A discovery run that failed after some devices were already rendered.
///
/// Output already emitted is never retracted, so the count travels with the
/// error to tell callers how much of the listing is on screen.
#[derive(Debug, Error)]
#[error("discovery aborted after {emitted} device(s): {error}")]
pub struct DiscoveryFailure {
    pub emitted: usize,
    #[source]
    pub error: Error,
}

impl DiscoveryFailure {
    /// Failure before any device block was rendered
    pub fn before_output(error: Error) -> Self {
        Self { emitted: 0, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_display() {
        let err = Error::Connect {
            host: "fileserver".to_string(),
            port: 3240,
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("fileserver:3240"));
        assert!(msg.contains("refused"));
    }

    #[test]
    fn test_discovery_failure_carries_emitted_count() {
        let failure = DiscoveryFailure {
            emitted: 2,
            error: Error::TransportRead(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "peer closed",
            )),
        };
        let msg = format!("{}", failure);
        assert!(msg.contains("after 2 device(s)"));
        assert!(msg.contains("peer closed"));
    }

    #[test]
    fn test_protocol_error_converts() {
        let err: Error = protocol::ProtocolError::MalformedHeader {
            expected: 6,
            actual: 1,
        }
        .into();
        assert!(matches!(err, Error::Malformed(_)));
    }
}
