//! Scanner module - the concurrent probing engine.
//!
//! Provides a unified interface for TCP connect and UDP probing, managing
//! concurrent probe tasks on the tokio runtime. All per-run mutable state
//! (open-port collection, progress sink, cancellation token) is owned by a
//! [`ScanSession`] created per invocation, so the engine can be called
//! repeatedly or concurrently by a higher-level caller without any
//! cross-run leakage.

pub mod tcp;
pub mod traits;
pub mod udp;

use crate::types::{Port, PortRange};
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use serde::Serialize;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use tcp::TcpProber;
pub use traits::{ProbeMode, ProbeState, Prober};
pub use udp::UdpProber;

/// How many probe futures the dispatch stream keeps in flight. The
/// semaphore controls actual probe concurrency; this only bounds the
/// stream's buffering.
const DISPATCH_BUFFER: usize = 1000;

/// Default number of concurrently executing probes.
pub const DEFAULT_CONCURRENCY: usize = 100;

/// Default per-probe timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Sink for progress reporting: one `advance` call per completed (or
/// cancellation-short-circuited) probe. Total calls over a run always
/// equal the number of ports in the range.
pub trait ProgressSink: Send + Sync {
    /// Report one unit of work completed.
    fn advance(&self);
}

impl ProgressSink for ProgressBar {
    fn advance(&self) {
        self.inc(1);
    }
}

/// No-op sink for callers that do not render progress.
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn advance(&self) {}
}

/// Thread-safe accumulator for open-port verdicts.
///
/// Workers call [`record`](Self::record) in arbitrary, possibly
/// duplicated order; [`finalize`](Self::finalize) produces the strictly
/// ascending, deduplicated report.
#[derive(Debug, Default)]
pub struct Aggregator {
    open_ports: Mutex<Vec<Port>>,
}

impl Aggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one open-port verdict. Safe to call concurrently.
    pub fn record(&self, port: Port) {
        self.open_ports
            .lock()
            .expect("aggregator mutex poisoned")
            .push(port);
    }

    /// Produce the sorted, deduplicated set of open ports.
    pub fn finalize(&self) -> Vec<Port> {
        let mut ports = self
            .open_ports
            .lock()
            .expect("aggregator mutex poisoned")
            .clone();
        ports.sort_unstable();
        ports.dedup();
        ports
    }
}

/// Configuration for one scan run. Immutable once the session starts.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Target IP address.
    pub target: IpAddr,
    /// Inclusive port range to enumerate.
    pub range: PortRange,
    /// Probe mode for this run.
    pub mode: ProbeMode,
    /// Maximum number of probes executing at the same instant.
    pub concurrency: usize,
    /// Per-probe timeout.
    pub timeout: Duration,
}

impl ScanConfig {
    /// Create a configuration with default mode, concurrency, and timeout.
    pub fn new(target: IpAddr, range: PortRange) -> Self {
        Self {
            target,
            range,
            mode: ProbeMode::default(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the probe mode.
    pub fn with_mode(mut self, mode: ProbeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the concurrency ceiling.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the per-probe timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Final report of one scan run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    /// Target that was probed.
    pub target: String,
    /// Probe mode used.
    pub mode: String,
    /// Number of ports enumerated.
    pub ports_scanned: usize,
    /// Open ports, strictly ascending, each unique.
    pub open_ports: Vec<Port>,
    /// Whether the run was cut short by cancellation (results partial).
    pub cancelled: bool,
    /// Wall-clock duration of the run.
    pub duration_ms: u64,
}

/// One scan invocation: owns the cancellation token, the open-port
/// aggregator, and the progress sink for the duration of the run.
pub struct ScanSession {
    config: ScanConfig,
    cancel: CancellationToken,
    aggregator: Aggregator,
    progress: Arc<dyn ProgressSink>,
}

impl ScanSession {
    /// Create a session with a fresh cancellation token and no progress
    /// rendering.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
            aggregator: Aggregator::new(),
            progress: Arc::new(SilentProgress),
        }
    }

    /// Attach a progress sink. It receives exactly one `advance` call
    /// per port in the range.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Handle for requesting cancellation of this run, e.g. from an
    /// interrupt-signal task. Cancellation is cooperative: probes already
    /// inside network I/O run to their natural timeout, everything not
    /// yet started is skipped.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute the scan and return the aggregated outcome.
    pub async fn run(&self) -> ScanOutcome {
        let prober: Arc<dyn Prober> = match self.config.mode {
            ProbeMode::Tcp => Arc::new(TcpProber::new(self.config.target, self.config.timeout)),
            ProbeMode::Udp => Arc::new(UdpProber::new(self.config.target, self.config.timeout)),
        };
        self.run_with(prober).await
    }

    /// Drive the given prober over the whole range with bounded
    /// concurrency. Ports are dispatched in ascending order; completion
    /// order is whatever the network makes of it.
    pub(crate) async fn run_with(&self, prober: Arc<dyn Prober>) -> ScanOutcome {
        let start_time = Instant::now();

        // Semaphore enforces the concurrency ceiling across all in-flight probes.
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));

        stream::iter(self.config.range.iter())
            .map(|port| {
                let sem = Arc::clone(&semaphore);
                let prober = Arc::clone(&prober);
                let cancel = self.cancel.clone();

                async move {
                    let _permit = sem.acquire().await.expect("semaphore never closed");

                    // Probe entry point: a set token short-circuits before
                    // any I/O. The progress tick below still fires, so tick
                    // totals stay consistent with the port count.
                    if !cancel.is_cancelled() && prober.probe(port).await == ProbeState::Open {
                        debug!(port = %port, "open port found");
                        self.aggregator.record(port);
                    }

                    self.progress.advance();
                }
            })
            .buffer_unordered(DISPATCH_BUFFER)
            .collect::<()>()
            .await;

        ScanOutcome {
            target: self.config.target.to_string(),
            mode: self.config.mode.to_string(),
            ports_scanned: self.config.range.len(),
            open_ports: self.aggregator.finalize(),
            cancelled: self.cancel.is_cancelled(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::net::Ipv4Addr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    /// Counts advance calls.
    struct CountingSink(AtomicUsize);

    impl CountingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self(AtomicUsize::new(0)))
        }
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl ProgressSink for CountingSink {
        fn advance(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Prober that tracks how many probes run at the same instant.
    struct TrackingProber {
        current: AtomicUsize,
        peak: AtomicUsize,
        open_ports: Vec<u16>,
    }

    impl TrackingProber {
        fn new(open_ports: Vec<u16>) -> Self {
            Self {
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                open_ports,
            }
        }
    }

    #[async_trait]
    impl Prober for TrackingProber {
        fn mode(&self) -> ProbeMode {
            ProbeMode::Tcp
        }

        fn target(&self) -> IpAddr {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(10)
        }

        async fn probe(&self, port: Port) -> ProbeState {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            self.current.fetch_sub(1, Ordering::SeqCst);

            if self.open_ports.contains(&port.as_u16()) {
                ProbeState::Open
            } else {
                ProbeState::ClosedOrFiltered
            }
        }
    }

    fn test_config(range: &str) -> ScanConfig {
        ScanConfig::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            range.parse().expect("valid range"),
        )
        .with_timeout(Duration::from_millis(200))
    }

    #[test]
    fn test_aggregator_sorts_and_dedups() {
        let agg = Aggregator::new();
        for p in [443u16, 22, 443, 80, 22] {
            agg.record(Port::new(p).unwrap());
        }

        let ports: Vec<u16> = agg.finalize().iter().map(|p| p.as_u16()).collect();
        assert_eq!(ports, vec![22, 80, 443]);
    }

    #[test]
    fn test_aggregator_empty() {
        assert!(Aggregator::new().finalize().is_empty());
    }

    #[tokio::test]
    async fn test_scan_finds_open_ports() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open_port = listener.local_addr().unwrap().port();

        // Range of 20 ports surrounding the listener.
        let start = open_port.saturating_sub(10).max(1);
        let end = start.saturating_add(19).min(u16::MAX);
        let range = PortRange::new(
            Port::new(start).unwrap(),
            Port::new(end).unwrap(),
        )
        .unwrap();

        let sink = CountingSink::new();
        let session = ScanSession::new(
            ScanConfig::new(IpAddr::V4(Ipv4Addr::LOCALHOST), range)
                .with_timeout(Duration::from_millis(500)),
        )
        .with_progress(Arc::clone(&sink) as Arc<dyn ProgressSink>);

        let outcome = session.run().await;

        assert!(!outcome.cancelled);
        assert_eq!(outcome.ports_scanned, range.len());
        assert_eq!(sink.count(), range.len());
        assert!(outcome
            .open_ports
            .iter()
            .any(|p| p.as_u16() == open_port));
    }

    #[tokio::test]
    async fn test_scan_no_open_ports() {
        let prober = Arc::new(TrackingProber::new(vec![]));
        let session = ScanSession::new(test_config("1-50"));

        let outcome = session.run_with(prober).await;

        assert!(outcome.open_ports.is_empty());
        assert!(!outcome.cancelled);
        assert_eq!(outcome.ports_scanned, 50);
    }

    #[tokio::test]
    async fn test_outcome_strictly_ascending() {
        let prober = Arc::new(TrackingProber::new(vec![40, 10, 30, 20]));
        let session = ScanSession::new(test_config("1-50").with_concurrency(16));

        let outcome = session.run_with(prober).await;

        let ports: Vec<u16> = outcome.open_ports.iter().map(|p| p.as_u16()).collect();
        assert_eq!(ports, vec![10, 20, 30, 40]);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let prober = Arc::new(TrackingProber::new(vec![]));
        let session = ScanSession::new(test_config("1-100").with_concurrency(5));

        session.run_with(Arc::clone(&prober) as Arc<dyn Prober>).await;

        assert!(
            prober.peak.load(Ordering::SeqCst) <= 5,
            "peak concurrency {} exceeded limit",
            prober.peak.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn test_pre_set_cancellation_short_circuits() {
        let prober = Arc::new(TrackingProber::new(vec![10, 20]));
        let sink = CountingSink::new();
        let session = ScanSession::new(test_config("1-200"))
            .with_progress(Arc::clone(&sink) as Arc<dyn ProgressSink>);

        session.cancel_token().cancel();

        let start = Instant::now();
        let outcome = session.run_with(Arc::clone(&prober) as Arc<dyn Prober>).await;

        assert!(outcome.cancelled);
        assert!(outcome.open_ports.is_empty());
        // Every port still ticks, even though none were probed.
        assert_eq!(sink.count(), 200);
        assert_eq!(prober.peak.load(Ordering::SeqCst), 0);
        // No I/O happened, so draining the queue is quick.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_mid_scan_cancellation_is_partial() {
        let prober = Arc::new(TrackingProber::new((1..=2000).collect()));
        let sink = CountingSink::new();
        let session = ScanSession::new(test_config("1-2000").with_concurrency(4))
            .with_progress(Arc::clone(&sink) as Arc<dyn ProgressSink>);

        let cancel = session.cancel_token();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });

        let outcome = session.run_with(Arc::clone(&prober) as Arc<dyn Prober>).await;

        assert!(outcome.cancelled);
        // Ticks cover the whole range even though probing stopped early.
        assert_eq!(sink.count(), 2000);
        // The outcome is a subset of the full result set.
        assert!(outcome.open_ports.len() < 2000);
        let ports: Vec<u16> = outcome.open_ports.iter().map(|p| p.as_u16()).collect();
        let mut sorted = ports.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ports, sorted);
    }
}
