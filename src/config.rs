//! Command-line configuration for flowwatch.
//!
//! This module defines all CLI arguments using `clap` for parsing.
//! The configuration selects the facility, the snapshot directory,
//! the evaluation cadence, the alert log, and the display mode.

use clap::Parser;

/// Fulfillment-center flow health monitor.
///
/// flowwatch re-reads exported dashboard snapshots at a fixed interval
/// and classifies them against per-facility reference bands. It flags:
///
/// - WIP outside the DEFAULT/OVERRIDE throughput bands
/// - Processing rates outside tolerance of the throughput references
/// - Rebin buffer utilization outside its published band
/// - CPT utilization inside an open SLA window at active levels
///
/// # Examples
///
/// ```bash
/// # Monitor GRU5 with the TUI (default)
/// flowwatch -f GRU5
///
/// # Headless mode over SSH, 30-second cadence
/// flowwatch -f GIG1 --headless -i 30
///
/// # Read exports from a shared drop directory
/// flowwatch -f REC3 -s /mnt/exports/rec3
/// ```
#[derive(Parser, Debug, Clone)]
#[command(version, about = "Monitor fulfillment-center flow health from exported snapshots")]
pub struct Config {
    /// Facility code to monitor (e.g. GRU5).
    ///
    /// Must be one of the permitted facility codes; unknown codes
    /// still run but every catalog-backed check reports "not found".
    #[arg(short, long)]
    pub facility: String,

    /// Directory containing the exported snapshot files.
    ///
    /// Expected contents: summary.json plus singles.csv/multis.csv
    /// (split view) or aggregated.csv (aggregated view). Files are
    /// re-read on every evaluation, so the exporter can refresh them
    /// in place.
    #[arg(short, long, default_value = "snapshots")]
    pub snapshot_dir: String,

    /// Interval in seconds between evaluations.
    ///
    /// Evaluations are cheap (a handful of file reads), so this is
    /// mostly a question of how often the exporter refreshes.
    #[arg(short, long, default_value_t = 60)]
    pub interval: u64,

    /// Path to the CSV alert log.
    ///
    /// Emitted alert rows are appended here. The file is created if
    /// it doesn't exist, and new rows are appended if it does
    /// (headers are only written once).
    #[arg(short = 'a', long, default_value = "alerts.csv")]
    pub alert_log: String,

    /// Number of past evaluations kept in memory for the TUI.
    #[arg(long, default_value_t = 30)]
    pub history_size: usize,

    /// Run in headless mode (no TUI, just logging).
    ///
    /// Useful for running over SSH without terminal capabilities,
    /// or when you just want the alert log without the dashboard.
    #[arg(long)]
    pub headless: bool,
}
