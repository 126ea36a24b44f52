//! Snapshot collectors for flowwatch.
//!
//! This module reads the exported dashboard files that the monitor
//! consumes and parses the text values embedded in them.
//!
//! # Data sources
//!
//! - `summary.json` - WIP count, throughput references, processing
//!   counts, and the rebin buffer reading
//! - `singles.csv` / `multis.csv` - risk-table exports for facilities
//!   with a split view
//! - `aggregated.csv` - the single risk-table export for facilities
//!   with an aggregated view
//!
//! Every reader returns `Option`: a missing or malformed file means
//! "no data" for that input, never a hard failure.

use std::path::Path;

use crate::snapshot::{RiskColumn, RiskTable, Snapshot};

/// Summary export file name.
pub const SUMMARY_FILE: &str = "summary.json";
/// Singles risk-table export file name.
pub const SINGLES_FILE: &str = "singles.csv";
/// Multis risk-table export file name.
pub const MULTIS_FILE: &str = "multis.csv";
/// Aggregated risk-table export file name.
pub const AGGREGATED_FILE: &str = "aggregated.csv";

/// Row index of the utilization row in a risk-table export.
const UTILIZATION_ROW: usize = 9;
/// First column carrying a deadline; the leading columns are labels.
const FIRST_DEADLINE_COLUMN: usize = 2;

/// Parse a percentage cell (`"96%"`, `" 85 "`).
///
/// The dashboard renders unbounded utilization as "∞"; that marker,
/// blank cells, and anything non-numeric parse to `None` so the value
/// is excluded from classification.
pub fn parse_percent(text: &str) -> Option<f64> {
    let cleaned = text.trim().trim_end_matches('%').trim();
    if cleaned.is_empty() || cleaned == "∞" {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a unit count rendered with thousands separators (`"12,345"`).
pub fn parse_count(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Read the summary export from a snapshot directory.
pub fn read_summary(dir: &Path) -> Option<Snapshot> {
    let raw = std::fs::read_to_string(dir.join(SUMMARY_FILE)).ok()?;
    serde_json::from_str(&raw).ok()
}

/// Read a risk-table export.
///
/// The export is the raw dashboard table: the first row is the header
/// whose columns from [`FIRST_DEADLINE_COLUMN`] carry CPT labels, and
/// row [`UTILIZATION_ROW`] carries the utilization percentages.
pub fn read_risk_table(path: &Path) -> Option<RiskTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .ok()?;

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record.ok()?);
    }

    let header = rows.first()?;
    let utilization = rows.get(UTILIZATION_ROW)?;

    let columns = header
        .iter()
        .enumerate()
        .skip(FIRST_DEADLINE_COLUMN)
        .map(|(i, label)| RiskColumn {
            deadline_label: label.trim().to_string(),
            utilization: utilization.get(i).and_then(parse_percent),
        })
        .collect();

    Some(RiskTable { columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("flowwatch-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        path
    }

    #[test]
    fn percent_parsing() {
        assert_eq!(parse_percent("96%"), Some(96.0));
        assert_eq!(parse_percent(" 85 "), Some(85.0));
        assert_eq!(parse_percent("102.5%"), Some(102.5));
        assert_eq!(parse_percent("∞"), None);
        assert_eq!(parse_percent(""), None);
        assert_eq!(parse_percent("n/a"), None);
    }

    #[test]
    fn count_parsing_strips_separators() {
        assert_eq!(parse_count("12,345"), Some(12345));
        assert_eq!(parse_count("987"), Some(987));
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("--"), None);
    }

    #[test]
    fn risk_table_extraction_geometry() {
        // Header row 0, utilization row 9, deadlines from column 2.
        let mut lines = vec!["Work Pool,Total,12/31 14:00,12/31 18:00,01/01 02:00".to_string()];
        for _ in 0..8 {
            lines.push(",,,,".to_string());
        }
        lines.push("Utilization,,96%,∞,40%".to_string());
        let path = write_temp("table.csv", &lines.join("\n"));

        let table = read_risk_table(&path).expect("table parses");
        std::fs::remove_file(&path).ok();

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].deadline_label, "12/31 14:00");
        assert_eq!(table.columns[0].utilization, Some(96.0));
        assert_eq!(table.columns[1].utilization, None, "∞ cell is excluded");
        assert_eq!(table.columns[2].utilization, Some(40.0));
    }

    #[test]
    fn short_table_yields_no_data() {
        let path = write_temp("short.csv", "only,one,row");
        assert!(read_risk_table(&path).is_none());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_files_yield_no_data() {
        let dir = std::env::temp_dir().join("flowwatch-missing-dir");
        assert!(read_summary(&dir).is_none());
        assert!(read_risk_table(&dir.join(SINGLES_FILE)).is_none());
    }

    #[test]
    fn summary_roundtrip() {
        let path = std::env::temp_dir().join(format!("flowwatch-{}-sum", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        std::fs::write(
            path.join(SUMMARY_FILE),
            r#"{ "facility": "GRU5", "wip": 12000, "lagrange": 5500, "override": 0,
                 "processing": { "pick": 4300, "pack": 4100 },
                 "buffer": { "queue": "pkMULTIZONE", "utilization": "85%",
                             "minimum": "80%", "maximum": "90%" } }"#,
        )
        .expect("write summary");

        let snapshot = read_summary(&path).expect("summary parses");
        std::fs::remove_dir_all(&path).ok();

        assert_eq!(snapshot.facility, "GRU5");
        assert_eq!(snapshot.wip, Some(12000));
        assert_eq!(snapshot.override_throughput, Some(0));
        assert_eq!(
            snapshot.processing.map(|p| p.combined_average()),
            Some(4200.0)
        );
    }
}
