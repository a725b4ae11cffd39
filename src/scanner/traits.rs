//! Prober trait abstraction.
//!
//! Defines a common interface for the per-port probe implementations,
//! enabling polymorphism and easier testing: the scheduler only ever sees
//! `dyn Prober`, so tests can inject synthetic probers without touching
//! the network.

use crate::types::Port;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Verdict of a single port probe.
///
/// The engine deliberately collapses every non-open outcome into one
/// state: it does not distinguish an active refusal from silent
/// filtering, and individual probe failures are never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeState {
    /// A response was observed within the timeout (successful connect,
    /// or a reply datagram).
    Open,
    /// Everything else: refused, timed out, unreachable, no reply.
    ClosedOrFiltered,
}

impl fmt::Display for ProbeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::ClosedOrFiltered => write!(f, "closed|filtered"),
        }
    }
}

/// Available probe modes. Exactly one mode applies per scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMode {
    /// Full TCP connect probing (default, no special privileges required).
    Tcp,
    /// Best-effort UDP send/receive probing.
    Udp,
}

impl Default for ProbeMode {
    fn default() -> Self {
        Self::Tcp
    }
}

impl fmt::Display for ProbeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP Connect"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

impl std::str::FromStr for ProbeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tcp" | "connect" => Ok(Self::Tcp),
            "udp" => Ok(Self::Udp),
            _ => Err(format!("unknown probe mode: {}", s)),
        }
    }
}

/// Trait for per-port probe implementations.
///
/// A prober holds the target address and timeout; `probe` performs one
/// bounded reachability check and returns a verdict. Network failures
/// are absorbed into [`ProbeState::ClosedOrFiltered`], never returned as
/// errors.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Get the probe mode this prober implements.
    fn mode(&self) -> ProbeMode;

    /// Probe a single port.
    async fn probe(&self, port: Port) -> ProbeState;

    /// Get the target IP address.
    fn target(&self) -> IpAddr;

    /// Get the configured per-probe timeout.
    fn timeout(&self) -> Duration;
}
