//! Pincer binary entry point.
//!
//! Parses and validates arguments, wires Ctrl-C to the session's
//! cancellation token, renders progress, and prints the final report.
//! The probing engine itself knows nothing about signals or terminals.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pincer::cli::{self, Args, OutputFormat};
use pincer::output;
use pincer::scanner::{ProgressSink, ScanConfig, ScanSession, SilentProgress};
use pincer::types::PortRange;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Validate everything before the engine sees it.
    let range: PortRange = args
        .ports
        .parse()
        .with_context(|| format!("invalid port range '{}'", args.ports))?;
    let target = cli::resolve_target(&args.target)
        .await
        .with_context(|| format!("invalid target '{}'", args.target))?;

    let config = ScanConfig::new(target, range)
        .with_mode(args.mode)
        .with_concurrency(args.concurrency)
        .with_timeout(Duration::from_millis(args.timeout));

    if !args.quiet && args.output == OutputFormat::Plain {
        output::print_scan_header(
            &args.target,
            &target.to_string(),
            &args.mode.to_string(),
            range.len(),
        );
    }

    // Progress bar doubles as the engine's progress sink.
    let progress_bar = if args.quiet || args.output != OutputFormat::Plain {
        None
    } else {
        let pb = ProgressBar::new(range.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
                .expect("static template is valid")
                .progress_chars("=>-"),
        );
        Some(pb)
    };

    let sink: Arc<dyn ProgressSink> = match &progress_bar {
        Some(pb) => Arc::new(pb.clone()),
        None => Arc::new(SilentProgress),
    };

    let session = ScanSession::new(config).with_progress(sink);

    // Ctrl-C requests cooperative cancellation; probes mid-I/O run to
    // their own timeout, so shutdown takes at most about one probe timeout.
    let cancel = session.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            output::print_warning("Ctrl-C detected! Stopping scan gracefully, please wait...");
            cancel.cancel();
        }
    });

    let outcome = session.run().await;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    output::print_outcome(&outcome, args.output)?;

    Ok(())
}
