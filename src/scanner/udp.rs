//! UDP prober implementation.
//!
//! Sends a single empty-payload datagram and waits for any reply within
//! the timeout. UDP is connectionless, so this is inherently best-effort
//! and under-detects: a service that silently ignores a one-byte probe
//! is indistinguishable from a closed port, and both classify as
//! `ClosedOrFiltered`. That is documented behavior, not a defect — the
//! prober makes no attempt to guess protocol-specific payloads.
//!
//! A send failure (e.g. a destination-unreachable surfaced synchronously
//! by the local stack) is inconclusive, not fatal: the prober still
//! waits on the receive step.

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::{ProbeMode, ProbeState, Prober};
use crate::types::Port;
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::trace;

/// Minimal probe payload: one NUL byte.
const PROBE_PAYLOAD: &[u8] = b"\x00";

/// UDP prober for detecting responsive UDP ports.
pub struct UdpProber {
    target: IpAddr,
    timeout: Duration,
}

impl UdpProber {
    /// Create a new UDP prober.
    ///
    /// # Arguments
    /// * `target` - Target IP address
    /// * `timeout` - How long to wait for a reply
    pub fn new(target: IpAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }

    /// Send the probe datagram and wait for any reply.
    async fn probe_port(&self, port: Port) -> ScanResult<ProbeState> {
        let addr = SocketAddr::new(self.target, port.as_u16());

        // Bind to a random local port matching the target's address family.
        let local_addr: SocketAddr = if self.target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(local_addr)
            .await
            .map_err(|e| ScanError::ConnectionFailed(e.to_string()))?;

        socket
            .connect(addr)
            .await
            .map_err(|e| ScanError::ConnectionFailed(e.to_string()))?;

        // Inconclusive on failure; the receive step still decides.
        if let Err(e) = socket.send(PROBE_PAYLOAD).await {
            trace!(port = port.as_u16(), error = %e, "udp send failed");
        }

        let mut buf = [0u8; 1024];
        match timeout(self.timeout, socket.recv(&mut buf)).await {
            // Any reply at all is sufficient; no payload validation.
            Ok(Ok(_)) => Ok(ProbeState::Open),
            // ICMP port-unreachable shows up here as a receive error.
            Ok(Err(e)) => Err(ScanError::ReceiveFailed(e.to_string())),
            Err(_) => Ok(ProbeState::ClosedOrFiltered),
        }
    }
}

#[async_trait]
impl Prober for UdpProber {
    fn mode(&self) -> ProbeMode {
        ProbeMode::Udp
    }

    fn target(&self) -> IpAddr {
        self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn probe(&self, port: Port) -> ProbeState {
        match self.probe_port(port).await {
            Ok(state) => state,
            Err(e) => {
                trace!(port = port.as_u16(), error = %e, "udp probe absorbed");
                ProbeState::ClosedOrFiltered
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[tokio::test]
    async fn test_prober_creation() {
        let prober = UdpProber::new(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_secs(1));
        assert_eq!(prober.target(), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(prober.mode(), ProbeMode::Udp);
    }

    #[tokio::test]
    async fn test_probe_replying_service() {
        // An echo responder: reply to whatever arrives.
        let responder = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = responder.local_addr().unwrap().port();
        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            if let Ok((n, peer)) = responder.recv_from(&mut buf).await {
                let _ = responder.send_to(&buf[..n.max(1)], peer).await;
            }
        });

        let prober = UdpProber::new(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_secs(1));
        let result = prober.probe(Port::new(port).unwrap()).await;

        assert_eq!(result, ProbeState::Open);
    }

    #[tokio::test]
    async fn test_probe_silent_port() {
        // A socket that never replies looks closed or filtered.
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = silent.local_addr().unwrap().port();

        let prober = UdpProber::new(IpAddr::V4(Ipv4Addr::LOCALHOST), Duration::from_millis(200));
        let result = prober.probe(Port::new(port).unwrap()).await;

        assert_eq!(result, ProbeState::ClosedOrFiltered);
        drop(silent);
    }
}
