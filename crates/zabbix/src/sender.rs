//! TCP transport for the trapper protocol.
//!
//! Each send is one-shot: resolve, connect under a deadline, write a single
//! frame, drain the response, close. No pooling, no retries.

use crate::frame;
use crate::types::Packet;
use common::{Error, Result};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, lookup_host};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default time allowed for the TCP connect to complete.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default time allowed for the server response to arrive.
///
/// The server closes the connection after responding, so the read is a full
/// drain; the deadline keeps a misbehaving peer from blocking the caller
/// indefinitely.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(15);

/// Handle for one trapper endpoint.
///
/// Immutable after construction and cheap to clone. Carries no connection
/// state, so a single value can be shared across concurrent tasks; every
/// call opens and closes its own connection.
#[derive(Debug, Clone)]
pub struct Sender {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) connect_timeout: Duration,
    pub(crate) read_timeout: Duration,
    pub(crate) verify_tls: bool,
}

impl Sender {
    /// Create a sender for `host:port` with default timeouts and TLS
    /// certificate verification enabled.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            verify_tls: true,
        }
    }

    /// Override the connect deadline.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the response read deadline.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Disable TLS certificate verification on the HTTPS push paths.
    ///
    /// Verification is on unless the caller opts out for endpoints with
    /// self-signed certificates.
    pub fn danger_accept_invalid_certs(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Send one metrics packet and return the raw server response.
    pub async fn send(&self, packet: &Packet) -> Result<Vec<u8>> {
        let frame = frame::encode(packet)?;
        let addr = self.resolve().await?;
        let mut stream = self.connect(addr).await?;
        debug!(%addr, frame_len = frame.len(), "connected to trapper endpoint");

        let result = self.exchange(&mut stream, &frame).await;
        if let Err(e) = &result {
            warn!(%addr, error = %e, "trapper exchange failed");
        }
        // The stream drops here on every path, closing the connection
        // exactly once.
        result
    }

    /// Resolve the configured `host:port` to a socket address.
    pub(crate) async fn resolve(&self) -> Result<SocketAddr> {
        let target = format!("{}:{}", self.host, self.port);
        let mut addrs = lookup_host(&target)
            .await
            .map_err(|source| Error::AddressResolution {
                target: target.clone(),
                source,
            })?;

        addrs.next().ok_or_else(|| Error::AddressResolution {
            target: target.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, "no addresses resolved"),
        })
    }

    /// Open a TCP connection under the configured deadline.
    ///
    /// When the deadline wins the race, the pending connect future is
    /// dropped, which closes a socket that completes late instead of
    /// leaking it.
    async fn connect(&self, addr: SocketAddr) -> Result<TcpStream> {
        match timeout(self.connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(Error::Connect { addr, source }),
            Err(_) => Err(Error::ConnectTimeout {
                addr,
                timeout: self.connect_timeout,
            }),
        }
    }

    /// Write the frame and drain the response until the peer closes.
    async fn exchange(&self, stream: &mut TcpStream, frame: &[u8]) -> Result<Vec<u8>> {
        stream.write_all(frame).await.map_err(Error::Write)?;

        let mut response = Vec::new();
        match timeout(self.read_timeout, stream.read_to_end(&mut response)).await {
            Ok(Ok(_)) => Ok(response),
            Ok(Err(source)) => Err(Error::Read(source)),
            Err(_) => Err(Error::Read(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no response within {:?}", self.read_timeout),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Metric;
    use std::time::Instant;

    #[tokio::test]
    async fn test_resolve_failure() {
        // RFC 2606 reserves .invalid; resolution can never succeed
        let sender = Sender::new("zabbix.invalid", 10051);
        let err = sender.resolve().await.unwrap_err();
        assert!(matches!(err, Error::AddressResolution { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let sender = Sender::new("127.0.0.1", 1).connect_timeout(Duration::from_millis(500));
        let packet = Packet::new(vec![Metric::new("srv1", "cpu.load", "0.42")]);

        let err = sender.send(&packet).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Connect { .. } | Error::ConnectTimeout { .. }
        ));
    }

    #[tokio::test]
    async fn test_send_fails_in_bounded_time() {
        let sender = Sender::new("127.0.0.1", 1).connect_timeout(Duration::from_millis(500));
        let packet = Packet::new(vec![Metric::new("srv1", "cpu.load", "0.42")]);

        let start = Instant::now();
        let _ = sender.send(&packet).await;
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
