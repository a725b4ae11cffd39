//! Output formatting module.
//!
//! Provides plain-text (console-styled) and JSON rendering of a scan
//! outcome.

use crate::cli::OutputFormat;
use crate::scanner::ScanOutcome;
use console::style;
use std::io::{self, Write};

/// Print the pre-scan header.
pub fn print_scan_header(target: &str, ip: &str, mode: &str, total_ports: usize) {
    println!();
    println!(
        "{}",
        style("════════════════════════════════════════════").cyan()
    );
    println!("          {}", style("Pincer Port Prober").cyan().bold());
    println!(
        "{}",
        style("════════════════════════════════════════════").cyan()
    );
    println!();
    println!("  {} {} ({})", style("Target:").bold(), target, ip);
    println!("  {} {}", style("Mode:").bold(), mode);
    println!("  {} {}", style("Ports:").bold(), total_ports);
    println!();
}

/// Print a warning message to stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("warning:").yellow().bold(), message);
}

/// Format and print the scan outcome according to the specified format.
pub fn print_outcome(outcome: &ScanOutcome, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(outcome),
        OutputFormat::Json => print_json(outcome),
    }
}

fn print_plain(outcome: &ScanOutcome) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;

    if outcome.cancelled {
        writeln!(
            out,
            "{}",
            style("Scan stopped early! Showing results so far...").yellow()
        )?;
    }

    if outcome.open_ports.is_empty() {
        writeln!(out, "{}", style("No open ports found.").red())?;
    } else {
        for port in &outcome.open_ports {
            writeln!(out, "{}", style(format!("port {} - open", port)).green())?;
        }
        let joined: Vec<String> = outcome.open_ports.iter().map(|p| p.to_string()).collect();
        writeln!(
            out,
            "\n{} {}",
            style("Open ports found:").green().bold(),
            joined.join(",")
        )?;
    }

    writeln!(
        out,
        "\n  {} ports probed in {} ms",
        outcome.ports_scanned, outcome.duration_ms
    )?;

    Ok(())
}

fn print_json(outcome: &ScanOutcome) -> io::Result<()> {
    let json = serde_json::to_string_pretty(outcome)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    println!("{}", json);
    Ok(())
}
