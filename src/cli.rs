//! Command-line interface definitions for Pincer.
//!
//! Uses `clap` derive macros for declarative argument parsing. All input
//! validation (target resolution, port-range bounds) happens here, before
//! the probing engine is ever invoked.

use crate::error::ScanError;
use crate::scanner::ProbeMode;
use clap::{Parser, ValueEnum};
use std::net::IpAddr;

/// A concurrent TCP/UDP port reachability prober.
#[derive(Parser, Debug)]
#[command(name = "pincer")]
#[command(author = "HueCodes <huecodes@proton.me>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A fast, concurrent port reachability prober", long_about = None)]
pub struct Args {
    /// Target IP address or hostname to scan
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Port range to scan (e.g., "80" or "1-1000")
    #[arg(short, long, default_value = "1-65535")]
    pub ports: String,

    /// Probe mode to use
    #[arg(short = 'm', long = "mode", value_enum, default_value = "tcp")]
    pub mode: ProbeMode,

    /// Maximum number of concurrent probes
    #[arg(short = 'c', long, default_value = "100")]
    pub concurrency: usize,

    /// Per-probe timeout in milliseconds
    #[arg(short = 't', long, default_value = "1000")]
    pub timeout: u64,

    /// Output format for results
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,

    /// Suppress the banner and progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    Plain,
    /// JSON structured output
    Json,
}

/// Resolve a target string to an IP address.
///
/// Accepts a literal IP directly; anything else goes through the system
/// resolver. The first resolved address wins.
pub async fn resolve_target(target: &str) -> Result<IpAddr, ScanError> {
    if let Ok(ip) = target.parse::<IpAddr>() {
        return Ok(ip);
    }

    let mut addrs = tokio::net::lookup_host((target, 0))
        .await
        .map_err(|e| ScanError::ConnectionFailed(format!("cannot resolve {}: {}", target, e)))?;

    addrs
        .next()
        .map(|a| a.ip())
        .ok_or_else(|| ScanError::ConnectionFailed(format!("no addresses for {}", target)))
}
