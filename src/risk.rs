//! CPT risk scanning for flowwatch.
//!
//! This module walks a risk-table export column by column, evaluates
//! every deadline against the facility's three alert categories, and
//! emits the alert rows the operator needs to see. A facility can be
//! safe for default shipments while at risk for expedite, so the
//! categories are classified independently and folded into one
//! composite message afterwards.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::catalog::{AlertCategory, TrbProfiles};
use crate::deadline::{format_deadline, parse_deadline, within_evaluation_window};
use crate::snapshot::{RiskTable, ShipmentGrouping};
use crate::thresholds::AlertVerdict;

/// Per-category verdicts for one deadline column.
#[derive(Clone, Copy, Debug, Default)]
pub struct CategoryVerdicts {
    pub default: AlertVerdict,
    pub priority: AlertVerdict,
    pub expedite: AlertVerdict,
}

impl CategoryVerdicts {
    /// Verdict for one category.
    pub fn get(&self, category: AlertCategory) -> AlertVerdict {
        match category {
            AlertCategory::Default => self.default,
            AlertCategory::Priority => self.priority,
            AlertCategory::Expedite => self.expedite,
        }
    }

    fn any(&self, verdict: AlertVerdict) -> bool {
        AlertCategory::ALL.iter().any(|c| self.get(*c) == verdict)
    }
}

/// One emitted alert row, ready for display and the CSV alert log.
#[derive(Serialize, Clone, Debug)]
pub struct RiskAlert {
    /// Facility code
    pub facility: String,
    /// Normalized deadline display text (raw label when unparsable)
    pub cpt: String,
    /// Utilization percentage that triggered the row
    pub value: f64,
    /// Composite message
    pub message: String,
    /// Shipment grouping the source table covers
    pub grouping: ShipmentGrouping,
    /// Per-category verdicts behind the composite
    #[serde(skip)]
    pub verdicts: CategoryVerdicts,
}

/// Scan one risk table and return the alert rows, in column order.
///
/// Per column with a numeric utilization value, each category is
/// checked independently: a missing profile or a closed SLA window
/// forces `OutOfWindow`, otherwise the value is classified against the
/// category band. Composite precedence: any `Active` category emits an
/// ACTIVE row naming every active category; otherwise an `Attention`
/// verdict emits a row only when no category was suppressed; anything
/// else stays silent.
pub fn scan(
    facility: &str,
    table: &RiskTable,
    profiles: &TrbProfiles,
    grouping: ShipmentGrouping,
    now: DateTime<FixedOffset>,
) -> Vec<RiskAlert> {
    let mut alerts = Vec::new();

    for column in &table.columns {
        let Some(value) = column.utilization else {
            continue;
        };

        let deadline = parse_deadline(&column.deadline_label, now);
        let display = deadline
            .map(format_deadline)
            .unwrap_or_else(|| column.deadline_label.clone());

        let verdict_for = |category: AlertCategory| match (profiles.get(category), deadline) {
            (Some(profile), Some(deadline))
                if within_evaluation_window(deadline, profile.lead_time_hours, now) =>
            {
                profile.band.classify(value)
            }
            _ => AlertVerdict::OutOfWindow,
        };

        let verdicts = CategoryVerdicts {
            default: verdict_for(AlertCategory::Default),
            priority: verdict_for(AlertCategory::Priority),
            expedite: verdict_for(AlertCategory::Expedite),
        };

        let active: Vec<&str> = AlertCategory::ALL
            .iter()
            .filter(|c| verdicts.get(**c) == AlertVerdict::Active)
            .map(|c| c.label())
            .collect();

        let message = if !active.is_empty() {
            format!(
                "TRB ACTIVE | CPT: {display} | Category: {} | Value: {value}%",
                active.join(" / ")
            )
        } else if verdicts.any(AlertVerdict::Attention) && !verdicts.any(AlertVerdict::OutOfWindow)
        {
            let band = profiles
                .default
                .map(|p| p.band.to_string())
                .unwrap_or_default();
            format!("ATTENTION | CPT: {display} | Value: {value}% | Default band: {band}")
        } else {
            continue;
        };

        alerts.push(RiskAlert {
            facility: facility.to_string(),
            cpt: display,
            value,
            message,
            grouping,
            verdicts,
        });
    }

    alerts
}
