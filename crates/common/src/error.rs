//! Common error types for the Zabbix relay components.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

/// A specialized Result type for relay operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the trapper and alert push transports.
///
/// Every transport operation surfaces its failure class to the caller;
/// nothing is retried or swallowed inside the transports themselves.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to resolve {target}: {source}")]
    AddressResolution {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connection to {addr} timed out after {timeout:?}")]
    ConnectTimeout { addr: SocketAddr, timeout: Duration },

    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write frame: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to read response: {0}")]
    Read(#[source] std::io::Error),

    #[error("invalid frame: {0}")]
    Frame(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("http request failed: {0}")]
    HttpTransport(#[from] reqwest::Error),

    #[error("http status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("invalid verification code: {0}")]
    SignatureInput(String),
}

impl Error {
    /// Create a new frame error.
    pub fn frame(msg: impl fmt::Display) -> Self {
        Error::Frame(msg.to_string())
    }

    /// Create a new signature input error.
    pub fn signature_input(msg: impl fmt::Display) -> Self {
        Error::SignatureInput(msg.to_string())
    }

    /// Whether this error is the connect or read deadline expiring.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::ConnectTimeout { .. } => true,
            Error::Read(source) => source.kind() == std::io::ErrorKind::TimedOut,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_classification() {
        let err = Error::ConnectTimeout {
            addr: "127.0.0.1:10051".parse().unwrap(),
            timeout: Duration::from_secs(5),
        };
        assert!(err.is_timeout());

        let err = Error::Read(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "no response",
        ));
        assert!(err.is_timeout());

        let err = Error::frame("bad magic");
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "invalid frame: bad magic");
    }
}
