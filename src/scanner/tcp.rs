//! TCP connect prober implementation.
//!
//! Performs standard TCP connect probes using the operating system's
//! socket API: a full handshake bounded by the configured timeout. No
//! data is sent or read; the connection is dropped as soon as it is
//! classified. This is uniform full-connect probing, not half-open SYN
//! scanning — no raw sockets, no elevated privileges.

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::{ProbeMode, ProbeState, Prober};
use crate::types::Port;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// TCP connect prober.
///
/// Uses standard socket connect() calls to determine port reachability.
pub struct TcpProber {
    target: IpAddr,
    timeout: Duration,
}

impl TcpProber {
    /// Create a new TCP connect prober.
    ///
    /// # Arguments
    /// * `target` - Target IP address to probe
    /// * `timeout` - Connection timeout per port
    pub fn new(target: IpAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }

    /// Attempt to connect to the target address.
    async fn attempt_connect(&self, addr: SocketAddr) -> ScanResult<TcpStream> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(match e.kind() {
                ErrorKind::ConnectionRefused => ScanError::ConnectionRefused,
                ErrorKind::HostUnreachable => ScanError::HostUnreachable,
                ErrorKind::NetworkUnreachable => ScanError::NetworkUnreachable(e.to_string()),
                _ => ScanError::ConnectionFailed(e.to_string()),
            }),
            Err(_) => Err(ScanError::Timeout),
        }
    }
}

#[async_trait]
impl Prober for TcpProber {
    fn mode(&self) -> ProbeMode {
        ProbeMode::Tcp
    }

    fn target(&self) -> IpAddr {
        self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn probe(&self, port: Port) -> ProbeState {
        let addr = SocketAddr::new(self.target, port.as_u16());

        match self.attempt_connect(addr).await {
            Ok(stream) => {
                // Classified; close immediately without exchanging data.
                drop(stream);
                ProbeState::Open
            }
            Err(e) => {
                trace!(port = port.as_u16(), error = %e, "tcp probe absorbed");
                ProbeState::ClosedOrFiltered
            }
        }
    }
}
