//! # Pincer - A Concurrent Port Reachability Prober
//!
//! Pincer determines which TCP or UDP ports on a host respond within a
//! bounded time budget, running many probes in flight simultaneously
//! while staying responsive to user-requested cancellation.
//!
//! ## Features
//!
//! - **TCP Connect and UDP probing**: full-connect TCP handshakes, or
//!   best-effort single-datagram UDP checks
//! - **Bounded concurrency**: a configurable worker ceiling caps file
//!   descriptor and ephemeral-port usage independent of range size
//! - **Cooperative cancellation**: Ctrl-C drains in-flight work and
//!   returns partial, still-valid results
//! - **Progress reporting**: one tick per port, pluggable sink
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use pincer::scanner::{ScanConfig, ScanSession};
//! use pincer::types::PortRange;
//! use std::net::IpAddr;
//!
//! #[tokio::main]
//! async fn main() {
//!     let target: IpAddr = "192.168.1.1".parse().unwrap();
//!     let range: PortRange = "1-1000".parse().unwrap();
//!
//!     let session = ScanSession::new(ScanConfig::new(target, range));
//!     let outcome = session.run().await;
//!
//!     println!("open: {:?}", outcome.open_ports);
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`types`] - Core type definitions with newtype patterns for type safety
//! - [`scanner`] - The probing engine: session, scheduler, probers
//! - [`cli`] - Command-line argument definitions and target resolution
//! - [`error`] - Probe-internal error taxonomy
//! - [`output`] - Output formatting utilities
//!
//! Note on scope: Pincer performs full-connect probing uniformly. It has
//! no raw-socket SYN mode and does not claim one.

pub mod cli;
pub mod error;
pub mod output;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use error::{ScanError, ScanResult};
pub use scanner::{
    Aggregator, ProbeMode, ProbeState, Prober, ProgressSink, ScanConfig, ScanOutcome, ScanSession,
};
pub use types::{Port, PortError, PortRange};
