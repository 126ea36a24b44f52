//! # flowwatch
//!
//! A fulfillment-center flow health monitor.
//!
//! ## Overview
//!
//! `flowwatch` watches a facility's operational health by comparing
//! exported dashboard snapshots against per-facility reference bands:
//!
//! - **WIP bands**: work-in-progress against the DEFAULT and OVERRIDE
//!   throughput plans, scaled by per-facility multipliers
//! - **Processing tolerance**: the hourly pick/pack rate against the
//!   same references, within ±5%
//! - **Buffer band**: rebin buffer utilization against its published
//!   minimum/maximum
//! - **CPT risk**: per-deadline utilization classified across three
//!   alert categories, each gated by its own SLA lead-time window
//!
//! Snapshots are plain files dropped by an exporter; flowwatch never
//! talks to the source dashboards itself.
//!
//! ## Usage
//!
//! ```bash
//! # Run with TUI (default)
//! flowwatch -f GRU5
//!
//! # Headless mode for logging only
//! flowwatch -f GRU5 --headless
//!
//! # Custom snapshot directory and cadence
//! flowwatch -f GIG1 -s /mnt/exports/gig1 -i 30
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`catalog`]: per-facility thresholds, lead times, and multipliers
//! - [`snapshot`]: data structures for exported observations
//! - [`collectors`]: snapshot file readers and text parsing
//! - [`thresholds`]: band classification
//! - [`deadline`]: CPT parsing and SLA window evaluation
//! - [`risk`]: the CPT risk scanner
//! - [`capacity`]: WIP, processing, and buffer validators
//! - [`app`]: main application state and coordination
//! - [`ui`]: terminal user interface

mod app;
mod availability;
mod capacity;
mod catalog;
mod collectors;
mod config;
mod deadline;
mod risk;
mod snapshot;
mod thresholds;
mod ui;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use app::App;
use config::Config;

fn main() -> std::io::Result<()> {
    let config = Config::parse();

    if !catalog::FACILITIES.contains(&config.facility.as_str()) {
        eprintln!(
            "Warning: {} is not a permitted facility code; catalog-backed checks will report \"not found\"",
            config.facility
        );
    }

    let app = App::new(config.clone())?;

    // Setup Ctrl+C / SIGTERM handler
    let running = Arc::new(AtomicBool::new(true));
    setup_signal_handler(running.clone());

    let interval = Duration::from_secs(config.interval);

    // Check if stdout is a TTY - if not, force headless mode
    let use_headless = config.headless || !is_terminal();
    if !config.headless && !is_terminal() {
        eprintln!("Warning: stdout is not a TTY, running in headless mode");
    }

    if use_headless {
        ui::run_headless(app, running, interval)?;
    } else {
        ui::run(app, running, interval)?;
    }

    Ok(())
}

/// Global flag for signal handler (must be static for signal safety).
static SIGNAL_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Set up signal handlers for graceful shutdown.
fn setup_signal_handler(running: Arc<AtomicBool>) {
    // Spawn a thread to monitor the signal flag and propagate to running
    let running_clone = running.clone();
    std::thread::spawn(move || {
        while running_clone.load(Ordering::Relaxed) {
            if SIGNAL_RECEIVED.load(Ordering::Relaxed) {
                running_clone.store(false, Ordering::Relaxed);
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
    });

    unsafe {
        libc::signal(
            libc::SIGINT,
            signal_handler as *const () as libc::sighandler_t,
        );
        libc::signal(
            libc::SIGTERM,
            signal_handler as *const () as libc::sighandler_t,
        );
    }
}

/// Signal handler that sets the signal flag (async-signal-safe).
extern "C" fn signal_handler(_: i32) {
    SIGNAL_RECEIVED.store(true, Ordering::Relaxed);
}

/// Check if stdout is connected to a terminal.
fn is_terminal() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) != 0 }
}
