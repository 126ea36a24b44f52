//! Snapshot input availability tracking for flowwatch.
//!
//! This module checks which export files are present in the snapshot
//! directory, allowing the UI to show warnings when checks are
//! degraded because an input is missing rather than unhealthy.

use std::path::Path;

use crate::catalog::RiskView;
use crate::collectors::{AGGREGATED_FILE, MULTIS_FILE, SINGLES_FILE, SUMMARY_FILE};

/// Tracks which snapshot inputs are available.
#[derive(Default, Clone, Debug)]
pub struct SnapshotAvailability {
    /// summary.json was found
    pub summary: bool,
    /// singles.csv was found
    pub singles_table: bool,
    /// multis.csv was found
    pub multis_table: bool,
    /// aggregated.csv was found
    pub aggregated_table: bool,
    /// Risk view the facility uses, recorded at probe time
    view: Option<RiskView>,
}

impl SnapshotAvailability {
    /// Probe the snapshot directory for the facility's inputs.
    pub fn probe(dir: &Path, view: RiskView) -> Self {
        Self {
            summary: dir.join(SUMMARY_FILE).is_file(),
            singles_table: dir.join(SINGLES_FILE).is_file(),
            multis_table: dir.join(MULTIS_FILE).is_file(),
            aggregated_table: dir.join(AGGREGATED_FILE).is_file(),
            view: Some(view),
        }
    }

    /// Generate warnings for missing inputs.
    pub fn get_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.summary {
            warnings.push(format!(
                "{SUMMARY_FILE} missing (WIP, processing, and buffer checks report no data)"
            ));
        }
        match self.view {
            Some(RiskView::Aggregated) => {
                if !self.aggregated_table {
                    warnings.push(format!("{AGGREGATED_FILE} missing (no CPT risk scan)"));
                }
            }
            Some(RiskView::SinglesMultis) => {
                if !self.singles_table {
                    warnings.push(format!("{SINGLES_FILE} missing (no singles risk scan)"));
                }
                if !self.multis_table {
                    warnings.push(format!("{MULTIS_FILE} missing (no multis risk scan)"));
                }
            }
            None => {}
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_warns_per_view() {
        let dir = std::env::temp_dir().join("flowwatch-availability-none");

        let split = SnapshotAvailability::probe(&dir, RiskView::SinglesMultis);
        let warnings = split.get_warnings();
        assert_eq!(warnings.len(), 3);
        assert!(warnings.iter().any(|w| w.contains(SINGLES_FILE)));
        assert!(warnings.iter().any(|w| w.contains(MULTIS_FILE)));

        let aggregated = SnapshotAvailability::probe(&dir, RiskView::Aggregated);
        let warnings = aggregated.get_warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains(AGGREGATED_FILE)));
    }

    #[test]
    fn present_inputs_produce_no_warnings() {
        let dir = std::env::temp_dir().join(format!("flowwatch-avail-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        std::fs::write(dir.join(SUMMARY_FILE), "{}").expect("write summary");
        std::fs::write(dir.join(AGGREGATED_FILE), "").expect("write table");

        let availability = SnapshotAvailability::probe(&dir, RiskView::Aggregated);
        std::fs::remove_dir_all(&dir).ok();

        assert!(availability.get_warnings().is_empty());
    }
}
