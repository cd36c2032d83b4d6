//! Run reporting
//!
//! The orchestrator never writes to the console directly; everything
//! user-facing goes through the [`Reporter`] trait so the classification
//! core can be exercised against a recording implementation in tests.

use crate::process::RunStatistics;
use crossterm::{
    ExecutableCommand,
    style::{Color, Print, Stylize, style},
};
use std::io::stdout;
use std::path::Path;

/// Sink for per-file progress and the end-of-run summary
pub trait Reporter {
    /// Called once before traversal starts
    fn run_started(&mut self, scan_path: &Path, dry_run: bool);

    /// Per-file progress; the orchestrator gates this on verbose mode
    fn processing(&mut self, name: &str, size: u64);

    /// A file could not be classified and is routed to the UNKNOWN bucket
    fn unclassified(&mut self, name: &str, reason: &str);

    /// A file is being copied, or would be in dry-run mode
    fn copying(&mut self, name: &str, destination: &Path, dry_run: bool);

    /// Final summary after the last file
    fn summary(&mut self, stats: &RunStatistics);
}

/// Reporter that writes styled output to stdout
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn run_started(&mut self, scan_path: &Path, dry_run: bool) {
        let _ = stdout().execute(Print(format!(
            "Reading files from {}\n",
            scan_path.display()
        )));
        if dry_run {
            let _ = stdout().execute(Print(
                style("Dry run, no files will be copied\n")
                    .with(Color::Yellow)
                    .bold(),
            ));
        }
    }

    fn processing(&mut self, name: &str, size: u64) {
        let _ = stdout().execute(Print(format!(
            "Processing {} (size: {} bytes)\n",
            name, size
        )));
    }

    fn unclassified(&mut self, name: &str, reason: &str) {
        let _ = stdout().execute(Print(
            style(format!("✗ {}: {}\n", name, reason))
                .with(Color::Red)
                .bold(),
        ));
    }

    fn copying(&mut self, name: &str, destination: &Path, dry_run: bool) {
        if dry_run {
            let _ = stdout().execute(Print(format!(
                "Copying {} to {}\n",
                name,
                destination.display()
            )));
        } else {
            let _ = stdout().execute(Print(
                style(format!("Copying {} to {}\n", name, destination.display()))
                    .with(Color::Green)
                    .bold(),
            ));
        }
    }

    fn summary(&mut self, stats: &RunStatistics) {
        print_separator();
        print_stat(
            "Classified images",
            &stats.classified.to_string(),
            Color::Green,
        );
        print_stat(
            "Unclassified files",
            &stats.unclassified.to_string(),
            Color::Red,
        );
        print_stat(
            "Total size (MB)",
            &format!("{:.2}", stats.total_megabytes()),
            Color::Cyan,
        );
        print_separator();
    }
}

fn print_separator() {
    let _ = stdout().execute(Print(format!("{}\n", "─".repeat(60))));
}

fn print_stat(key: &str, value: &str, color: Color) {
    let key_styled = style(key).with(Color::DarkGrey);
    let value_styled = style(value).with(color).bold();
    let _ = stdout().execute(Print("  "));
    let _ = stdout().execute(Print(key_styled));
    let _ = stdout().execute(Print(": "));
    let _ = stdout().execute(Print(value_styled));
    let _ = stdout().execute(Print("\n"));
}
