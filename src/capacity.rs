//! Capacity band validators for flowwatch.
//!
//! Four stateless comparators benchmark a facility's live numbers
//! against its references: WIP against the DEFAULT (lagrange) and
//! OVERRIDE throughput plans, the hourly processing rate against both
//! references, and the rebin buffer against its published band. Each
//! comparison is independent; a missing input degrades that one check
//! to an informational verdict and never suppresses the others.

use crate::catalog::FacilityCatalog;
use crate::collectors::parse_percent;
use crate::snapshot::BufferReading;

/// Relative tolerance for the processing-rate comparison.
const PROCESSING_TOLERANCE: f64 = 0.05;

/// Outcome of one capacity comparison.
#[derive(Clone, Debug)]
pub struct CapacityCheck {
    /// Metric/reference pair the check covers (e.g. `"WIP/DEFAULT"`)
    pub metric: String,
    /// Observed value, when one was available
    pub observed: Option<f64>,
    /// Reference value the observation was compared against
    pub reference: Option<f64>,
    /// Human-readable verdict line
    pub verdict: String,
}

impl CapacityCheck {
    fn info(metric: &str, verdict: String) -> Self {
        Self {
            metric: metric.to_string(),
            observed: None,
            reference: None,
            verdict,
        }
    }
}

/// Join the verdict lines of a batch of checks for display.
pub fn render(checks: &[CapacityCheck]) -> String {
    checks
        .iter()
        .map(|c| c.verdict.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Benchmark WIP against the DEFAULT and OVERRIDE throughput plans.
///
/// Each reference spawns its own band `[ref * minimum, ref * maximum]`
/// from the facility's multiplier pair; the two bands are evaluated
/// independently. A reference of zero or less reports "no value
/// defined" for that band only.
pub fn check_wip(
    facility: &str,
    wip: Option<i64>,
    lagrange: Option<i64>,
    override_throughput: Option<i64>,
    catalog: &FacilityCatalog,
) -> Vec<CapacityCheck> {
    let Some(multipliers) = catalog.wip_multipliers(facility) else {
        return vec![CapacityCheck::info(
            "WIP",
            format!("Facility {facility} not found in the WIP multiplier table"),
        )];
    };

    let Some(wip) = wip else {
        return vec![CapacityCheck::info(
            "WIP",
            "No WIP reading available".to_string(),
        )];
    };
    let wip = wip as f64;

    let references = [("DEFAULT", lagrange), ("OVERRIDE", override_throughput)];
    references
        .iter()
        .map(|&(label, reference)| {
            let metric = format!("WIP/{label}");
            let reference = reference.unwrap_or(0) as f64;
            if reference <= 0.0 {
                return CapacityCheck::info(&metric, format!("No {label} value defined"));
            }

            let band_min = reference * multipliers.minimum;
            let band_max = reference * multipliers.maximum;
            let verdict = if wip < band_min {
                let deviation = (1.0 - wip / band_min) * 100.0;
                format!("WIP {deviation:.1}% below the {label} minimum")
            } else if wip > band_max {
                let deviation = (wip / band_max - 1.0) * 100.0;
                format!("WIP {deviation:.1}% above the {label} maximum")
            } else {
                format!("WIP within the {label} band")
            };

            CapacityCheck {
                metric,
                observed: Some(wip),
                reference: Some(reference),
                verdict,
            }
        })
        .collect()
}

/// Benchmark the combined processing rate against both references.
///
/// The observation is accepted within ±5% of a reference; outside that
/// the deviation percentage and direction are reported. Non-positive
/// references are never evaluated.
pub fn check_processing(
    rate: Option<f64>,
    lagrange: Option<i64>,
    override_throughput: Option<i64>,
) -> Vec<CapacityCheck> {
    let Some(rate) = rate else {
        return vec![CapacityCheck::info(
            "Processing",
            "No processing reading available".to_string(),
        )];
    };

    let references = [("Lagrange", lagrange), ("Override", override_throughput)];
    references
        .iter()
        .map(|&(label, reference)| {
            let metric = format!("Processing/{label}");
            let reference = reference.unwrap_or(0) as f64;
            if reference <= 0.0 {
                return CapacityCheck::info(&metric, format!("No valid reference for {label}"));
            }

            let difference = rate - reference;
            let verdict = if difference.abs() <= PROCESSING_TOLERANCE * reference {
                format!("Processing within tolerance for {label} (±5%)")
            } else {
                let deviation = difference.abs() / reference * 100.0;
                let direction = if difference < 0.0 { "below" } else { "above" };
                format!("Processing {deviation:.1}% {direction} {label}")
            };

            CapacityCheck {
                metric,
                observed: Some(rate),
                reference: Some(reference),
                verdict,
            }
        })
        .collect()
}

/// Benchmark a rebin buffer reading against its published band.
///
/// All three values arrive as display text (`"85%"`) and are parsed
/// here; any unparsable field degrades to a "no data" verdict.
pub fn check_buffer(queue: &str, reading: &BufferReading) -> CapacityCheck {
    let metric = format!("Buffer/{queue}");
    let observed = reading.utilization.as_deref().and_then(parse_percent);
    let minimum = reading.minimum.as_deref().and_then(parse_percent);
    let maximum = reading.maximum.as_deref().and_then(parse_percent);

    let (Some(observed), Some(minimum), Some(maximum)) = (observed, minimum, maximum) else {
        return CapacityCheck::info(&metric, format!("No buffer data available for {queue}"));
    };
    if maximum <= 0.0 || minimum > maximum {
        return CapacityCheck::info(&metric, format!("No valid buffer band for {queue}"));
    }

    let verdict = if observed < minimum {
        let deviation = (1.0 - observed / minimum) * 100.0;
        format!("Buffer {queue} {deviation:.1}% below the band minimum")
    } else if observed > maximum {
        let deviation = (observed / maximum - 1.0) * 100.0;
        format!("Buffer {queue} {deviation:.1}% above the band maximum")
    } else {
        format!("Buffer {queue} within the {minimum}-{maximum} band")
    };

    CapacityCheck {
        metric,
        observed: Some(observed),
        reference: Some(maximum),
        verdict,
    }
}
