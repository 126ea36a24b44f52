//! Observation data structures for flowwatch.
//!
//! This module defines the [`Snapshot`] struct holding one round of
//! exported dashboard observations for a facility, plus the risk-table
//! shape consumed by the CPT scanner. Every field that can be missing
//! from an export is an `Option`: one absent input degrades to an
//! informational verdict, never an error.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::collectors::parse_count;

/// Accept a unit count as a JSON number or as exporter text with
/// thousands separators (`"12,345"`); unparsable text becomes `None`.
fn de_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CountField {
        Number(i64),
        Text(String),
    }

    Ok(match Option::<CountField>::deserialize(deserializer)? {
        Some(CountField::Number(n)) => Some(n),
        Some(CountField::Text(t)) => parse_count(&t),
        None => None,
    })
}

/// Shipment grouping a risk table covers.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShipmentGrouping {
    /// Single-item shipments
    Singles,
    /// Multi-item shipments
    Multis,
}

impl fmt::Display for ShipmentGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShipmentGrouping::Singles => write!(f, "Singles"),
            ShipmentGrouping::Multis => write!(f, "Multis"),
        }
    }
}

/// Hourly processing counts from the process-path rollup export.
#[derive(Deserialize, Clone, Copy, Debug, Default)]
pub struct ProcessingRate {
    /// Units picked in the window
    pub pick: u64,
    /// Units packed in the window (singles + multis)
    pub pack: u64,
}

impl ProcessingRate {
    /// Combined rate benchmarked against the throughput references.
    pub fn combined_average(&self) -> f64 {
        (self.pick + self.pack) as f64 / 2.0
    }
}

/// Rebin buffer reading as published by the dashboard.
///
/// All three values arrive as display strings (`"85%"`); the band
/// comes with the reading because the dashboard publishes current,
/// minimum, and maximum side by side.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct BufferReading {
    /// Queue label (e.g. `"pkMULTIZONE"`)
    #[serde(default)]
    pub queue: Option<String>,
    /// Current utilization text
    #[serde(default)]
    pub utilization: Option<String>,
    /// Band minimum text
    #[serde(default)]
    pub minimum: Option<String>,
    /// Band maximum text
    #[serde(default)]
    pub maximum: Option<String>,
}

/// One round of exported observations for a facility.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Snapshot {
    /// Facility code the export was taken from
    pub facility: String,
    /// Current work-in-progress unit count
    #[serde(default, deserialize_with = "de_count")]
    pub wip: Option<i64>,
    /// Planning throughput reference (zero when unset)
    #[serde(default, deserialize_with = "de_count")]
    pub lagrange: Option<i64>,
    /// Override throughput reference (zero when unset)
    #[serde(default, rename = "override", deserialize_with = "de_count")]
    pub override_throughput: Option<i64>,
    /// Hourly processing counts
    #[serde(default)]
    pub processing: Option<ProcessingRate>,
    /// Rebin buffer reading
    #[serde(default)]
    pub buffer: Option<BufferReading>,
}

/// One column of a risk-table export.
#[derive(Clone, Debug, PartialEq)]
pub struct RiskColumn {
    /// Raw deadline label from the header row (`"12/31 14:00"`)
    pub deadline_label: String,
    /// Utilization percentage; `None` for blank or "∞" cells
    pub utilization: Option<f64>,
}

/// Per-deadline utilization row extracted from a risk-table export.
#[derive(Clone, Debug, Default)]
pub struct RiskTable {
    /// Columns in export order
    pub columns: Vec<RiskColumn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_average_halves_the_sum() {
        let rate = ProcessingRate { pick: 4300, pack: 4100 };
        assert_eq!(rate.combined_average(), 4200.0);
    }

    #[test]
    fn snapshot_tolerates_missing_fields() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{ "facility": "GRU5" }"#).expect("minimal snapshot");
        assert_eq!(snapshot.facility, "GRU5");
        assert!(snapshot.wip.is_none());
        assert!(snapshot.processing.is_none());
        assert!(snapshot.buffer.is_none());
    }

    #[test]
    fn snapshot_reads_override_keyword_field() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{ "facility": "GIG1", "wip": 9800, "lagrange": 5200, "override": 5400 }"#,
        )
        .expect("full snapshot");
        assert_eq!(snapshot.override_throughput, Some(5400));
    }

    #[test]
    fn snapshot_accepts_counts_as_exporter_text() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{ "facility": "GRU5", "wip": "12,345", "lagrange": "5,500", "override": "n/a" }"#,
        )
        .expect("text counts");
        assert_eq!(snapshot.wip, Some(12345));
        assert_eq!(snapshot.lagrange, Some(5500));
        assert_eq!(snapshot.override_throughput, None, "unparsable text degrades");
    }

    #[test]
    fn grouping_labels() {
        assert_eq!(ShipmentGrouping::Singles.to_string(), "Singles");
        assert_eq!(ShipmentGrouping::Multis.to_string(), "Multis");
    }
}
