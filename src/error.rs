//! Error types for Pincer.
//!
//! Uses `thiserror` for ergonomic error definitions.
//!
//! Probe-level network errors are expected, high-frequency output: the
//! engine never surfaces them to the caller, it folds every one of them
//! into a `ClosedOrFiltered` verdict. The taxonomy below exists so the
//! probes can classify what happened for trace logging.

use thiserror::Error;

/// Main error type for probing operations.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection timed out")]
    Timeout,

    #[error("Connection refused")]
    ConnectionRefused,

    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Host unreachable")]
    HostUnreachable,

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for probe operations.
pub type ScanResult<T> = Result<T, ScanError>;
