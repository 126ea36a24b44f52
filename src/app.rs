//! Application state and logic for flowwatch.
//!
//! This module contains the main [`App`] struct which coordinates
//! snapshot collection, classification, alert logging, and the user
//! interface.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};

use crate::availability::SnapshotAvailability;
use crate::capacity::{self, CapacityCheck};
use crate::catalog::{FacilityCatalog, RiskView};
use crate::collectors::{self, AGGREGATED_FILE, MULTIS_FILE, SINGLES_FILE};
use crate::config::Config;
use crate::deadline;
use crate::risk::{self, RiskAlert};
use crate::snapshot::{BufferReading, ShipmentGrouping, Snapshot};

/// One completed evaluation round, ready for display.
#[derive(Clone, Debug)]
pub struct Evaluation {
    /// When the evaluation ran (site time)
    pub collected_at: DateTime<FixedOffset>,
    /// The summary snapshot, when one could be read
    pub snapshot: Option<Snapshot>,
    /// WIP band checks (DEFAULT and OVERRIDE)
    pub wip_checks: Vec<CapacityCheck>,
    /// Processing-rate checks (Lagrange and Override)
    pub processing_checks: Vec<CapacityCheck>,
    /// Rebin buffer check
    pub buffer_check: CapacityCheck,
    /// Emitted CPT risk alert rows, in column order
    pub alerts: Vec<RiskAlert>,
    /// Missing-input and configuration warnings
    pub warnings: Vec<String>,
}

/// Main application state.
///
/// Holds configuration, the immutable facility catalog, evaluation
/// history, and the CSV alert log.
pub struct App {
    /// Application configuration from CLI
    pub config: Config,

    /// Immutable per-facility threshold catalog
    pub catalog: FacilityCatalog,

    /// Past evaluations for the TUI
    pub history: VecDeque<Evaluation>,

    /// CSV writer for the alert log
    csv_writer: Option<csv::Writer<File>>,
}

impl App {
    /// Create a new application instance.
    ///
    /// This opens the alert log in append mode and loads the facility
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the alert log cannot be opened.
    pub fn new(config: Config) -> std::io::Result<Self> {
        // Initialize CSV writer (append mode, write header if new file)
        let log_exists = Path::new(&config.alert_log).exists();
        let log_file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&config.alert_log)?;

        let csv_writer = csv::WriterBuilder::new()
            .has_headers(!log_exists)
            .from_writer(log_file);

        let history_size = config.history_size;

        Ok(Self {
            config,
            catalog: FacilityCatalog::default(),
            history: VecDeque::with_capacity(history_size),
            csv_writer: Some(csv_writer),
        })
    }

    /// Snapshot directory as a path.
    fn snapshot_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.snapshot_dir)
    }

    /// Run one evaluation round.
    ///
    /// This is the main classification function that:
    /// 1. Probes which snapshot inputs are available
    /// 2. Reads the summary export and the risk-table exports
    /// 3. Runs the WIP, processing, and buffer validators
    /// 4. Scans the risk tables across the three alert categories
    /// 5. Appends emitted alert rows to the CSV log
    ///
    /// Missing or malformed inputs degrade to "no data" verdicts and
    /// warnings; they never abort the round.
    pub fn evaluate(&mut self) -> std::io::Result<Evaluation> {
        let now = deadline::site_now();
        let facility = self.config.facility.clone();
        let dir = self.snapshot_dir();
        let view = self.catalog.risk_view(&facility);

        let availability = SnapshotAvailability::probe(&dir, view);
        let mut warnings = availability.get_warnings();
        if !self.catalog.is_known(&facility) {
            warnings.push(format!("Facility {facility} is not in the permitted list"));
        }

        let snapshot = collectors::read_summary(&dir);
        let (wip, lagrange, override_throughput, processing_rate, buffer) = match &snapshot {
            Some(s) => (
                s.wip,
                s.lagrange,
                s.override_throughput,
                s.processing.map(|p| p.combined_average()),
                s.buffer.clone(),
            ),
            None => (None, None, None, None, None),
        };

        let wip_checks = capacity::check_wip(
            &facility,
            wip,
            lagrange,
            override_throughput,
            &self.catalog,
        );
        let processing_checks =
            capacity::check_processing(processing_rate, lagrange, override_throughput);

        let buffer_check = match self.catalog.buffer_queue(&facility) {
            Some(queue) => {
                // A reading labeled for a different queue is not ours.
                let reading = match buffer {
                    Some(r)
                        if r.queue.is_none()
                            || r.queue.as_deref() == Some(queue.destination()) =>
                    {
                        r
                    }
                    _ => BufferReading::default(),
                };
                capacity::check_buffer(queue.destination(), &reading)
            }
            None => CapacityCheck {
                metric: "Buffer".to_string(),
                observed: None,
                reference: None,
                verdict: format!("No buffer queue configured for {facility}"),
            },
        };

        let profiles = self.catalog.trb_profiles(&facility);
        if profiles.is_empty() {
            warnings.push(format!("Facility {facility} not found in the threshold catalog"));
        }

        let mut alerts = Vec::new();
        match view {
            RiskView::Aggregated => {
                if let Some(table) = collectors::read_risk_table(&dir.join(AGGREGATED_FILE)) {
                    alerts.extend(risk::scan(
                        &facility,
                        &table,
                        &profiles,
                        ShipmentGrouping::Singles,
                        now,
                    ));
                }
            }
            RiskView::SinglesMultis => {
                if let Some(table) = collectors::read_risk_table(&dir.join(SINGLES_FILE)) {
                    alerts.extend(risk::scan(
                        &facility,
                        &table,
                        &profiles,
                        ShipmentGrouping::Singles,
                        now,
                    ));
                }
                if let Some(table) = collectors::read_risk_table(&dir.join(MULTIS_FILE)) {
                    alerts.extend(risk::scan(
                        &facility,
                        &table,
                        &profiles,
                        ShipmentGrouping::Multis,
                        now,
                    ));
                }
            }
        }

        self.log_alerts(&alerts)?;

        Ok(Evaluation {
            collected_at: now,
            snapshot,
            wip_checks,
            processing_checks,
            buffer_check,
            alerts,
            warnings,
        })
    }

    /// Append emitted alert rows to the CSV log.
    fn log_alerts(&mut self, alerts: &[RiskAlert]) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.csv_writer {
            for alert in alerts {
                writer.serialize(alert).map_err(std::io::Error::other)?;
            }
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &Path, alert_log: &Path) -> Config {
        Config {
            facility: "GRU5".to_string(),
            snapshot_dir: dir.to_string_lossy().into_owned(),
            interval: 60,
            alert_log: alert_log.to_string_lossy().into_owned(),
            history_size: 5,
            headless: true,
        }
    }

    #[test]
    fn empty_snapshot_dir_degrades_instead_of_failing() {
        let base = std::env::temp_dir().join(format!("flowwatch-app-{}", std::process::id()));
        let dir = base.join("snapshots");
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let alert_log = base.join("alerts.csv");

        let mut app = App::new(test_config(&dir, &alert_log)).expect("app opens");
        let evaluation = app.evaluate().expect("evaluation runs");
        std::fs::remove_dir_all(&base).ok();

        assert!(evaluation.snapshot.is_none());
        assert!(evaluation.alerts.is_empty());
        assert!(!evaluation.warnings.is_empty());
        assert_eq!(evaluation.wip_checks.len(), 1);
        assert_eq!(evaluation.wip_checks[0].verdict, "No WIP reading available");
        assert_eq!(
            evaluation.buffer_check.verdict,
            "No buffer data available for pkMULTIZONE"
        );
    }
}
