//! Facility threshold catalog for flowwatch.
//!
//! Static per-facility configuration: TRB bands and SLA lead times for
//! the three alert categories, WIP multiplier pairs, and which risk
//! view and sortation buffer queue each facility uses. Built once at
//! startup and never mutated; facility quirks live here so the
//! classification code never branches on facility identity.

use std::collections::HashMap;

use crate::thresholds::ThresholdBand;

/// Facility codes the monitor accepts.
pub const FACILITIES: &[&str] = &[
    "BSB1", "CNF1", "FOR2", "GIG1", "GIG2", "GRU5", "GRU8", "GRU9", "POA1", "REC1", "REC3", "XCV9",
];

/// Alert category for CPT risk classification.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AlertCategory {
    /// Standard shipments
    Default,
    /// Priority shipments
    Priority,
    /// Expedited shipments
    Expedite,
}

impl AlertCategory {
    /// All categories, in scan order.
    pub const ALL: [AlertCategory; 3] = [
        AlertCategory::Default,
        AlertCategory::Priority,
        AlertCategory::Expedite,
    ];

    /// Stable label used in alert messages.
    pub fn label(&self) -> &'static str {
        match self {
            AlertCategory::Default => "DEFAULT",
            AlertCategory::Priority => "PRIORITY",
            AlertCategory::Expedite => "EXPEDITE",
        }
    }
}

/// Threshold band plus SLA lead time for one alert category.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlaProfile {
    /// Utilization band for the category
    pub band: ThresholdBand,
    /// Hours before the CPT at which evaluation becomes meaningful
    pub lead_time_hours: f64,
}

/// The three category profiles for one facility.
///
/// A category may be absent when the facility is only partially
/// configured (GIG2 has a default profile only); absent categories
/// scan as suppressed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrbProfiles {
    pub default: Option<SlaProfile>,
    pub priority: Option<SlaProfile>,
    pub expedite: Option<SlaProfile>,
}

impl TrbProfiles {
    /// Profile for one category.
    pub fn get(&self, category: AlertCategory) -> Option<SlaProfile> {
        match category {
            AlertCategory::Default => self.default,
            AlertCategory::Priority => self.priority,
            AlertCategory::Expedite => self.expedite,
        }
    }

    /// Whether any category is configured.
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.priority.is_none() && self.expedite.is_none()
    }
}

/// WIP band scaling factors applied to a throughput reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WipMultipliers {
    /// Reference multiplier for the band minimum
    pub minimum: f64,
    /// Reference multiplier for the band maximum
    pub maximum: f64,
}

/// Which risk-table exports a facility produces.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RiskView {
    /// One aggregated table covering all shipments
    Aggregated,
    /// Separate singles and multis tables
    SinglesMultis,
}

/// Which sortation buffer queue a facility monitors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BufferQueue {
    /// pkMULTIZONE rebin buffer
    Multizone,
    /// pkMULTISMALL rebin buffer
    Multismall,
}

impl BufferQueue {
    /// Destination label as published by the sortation dashboard.
    pub fn destination(&self) -> &'static str {
        match self {
            BufferQueue::Multizone => "pkMULTIZONE",
            BufferQueue::Multismall => "pkMULTISMALL",
        }
    }
}

/// Immutable catalog of per-facility thresholds and selections.
#[derive(Clone, Debug)]
pub struct FacilityCatalog {
    default_profiles: HashMap<&'static str, SlaProfile>,
    priority_profiles: HashMap<&'static str, SlaProfile>,
    expedite_profiles: HashMap<&'static str, SlaProfile>,
    wip_multipliers: HashMap<&'static str, WipMultipliers>,
    aggregated: &'static [&'static str],
    buffer_queues: HashMap<&'static str, BufferQueue>,
}

fn profile(lower: f64, upper: f64, lead_time_hours: f64) -> SlaProfile {
    SlaProfile {
        band: ThresholdBand::new(lower, upper),
        lead_time_hours,
    }
}

impl Default for FacilityCatalog {
    fn default() -> Self {
        let expedite_profiles = HashMap::from([
            ("BSB1", profile(175.0, 180.0, 1.0)),
            ("CNF1", profile(195.0, 200.0, 1.0)),
            ("FOR2", profile(185.0, 190.0, 1.0)),
            ("GIG1", profile(195.0, 200.0, 1.5)),
            ("GRU5", profile(185.0, 190.0, 1.5)),
            ("GRU8", profile(195.0, 200.0, 1.0)),
            ("GRU9", profile(195.0, 200.0, 1.5)),
            ("POA1", profile(87.0, 90.0, 1.5)),
            ("REC1", profile(87.0, 90.0, 1.0)),
            ("REC3", profile(195.0, 200.0, 1.5)),
            ("XCV9", profile(195.0, 200.0, 1.0)),
        ]);

        let priority_profiles = HashMap::from([
            ("BSB1", profile(90.0, 95.0, 1.75)),
            ("CNF1", profile(90.0, 95.0, 3.0)),
            ("FOR2", profile(90.0, 95.0, 2.0)),
            ("GIG1", profile(90.0, 95.0, 2.0)),
            ("GRU5", profile(90.0, 95.0, 2.0)),
            ("GRU8", profile(90.0, 95.0, 2.0)),
            ("GRU9", profile(90.0, 95.0, 3.5)),
            ("POA1", profile(90.0, 95.0, 2.0)),
            ("REC1", profile(90.0, 95.0, 2.0)),
            ("REC3", profile(90.0, 95.0, 3.0)),
            ("XCV9", profile(90.0, 95.0, 2.0)),
        ]);

        let default_profiles = HashMap::from([
            ("BSB1", profile(90.0, 95.0, 1.75)),
            ("CNF1", profile(90.0, 95.0, 3.0)),
            ("FOR2", profile(90.0, 95.0, 2.0)),
            ("GIG1", profile(90.0, 95.0, 2.0)),
            ("GIG2", profile(87.0, 90.0, 4.0)),
            ("GRU5", profile(90.0, 95.0, 2.25)),
            ("GRU8", profile(90.0, 95.0, 2.0)),
            ("GRU9", profile(90.0, 95.0, 3.5)),
            ("POA1", profile(90.0, 95.0, 2.0)),
            ("REC1", profile(87.0, 90.0, 2.0)),
            ("REC3", profile(90.0, 95.0, 3.0)),
            ("XCV9", profile(90.0, 95.0, 3.0)),
        ]);

        let wip_multipliers = HashMap::from([
            ("GRU5", WipMultipliers { minimum: 1.8, maximum: 2.2 }),
            ("CNF1", WipMultipliers { minimum: 1.5, maximum: 2.2 }),
            ("GIG1", WipMultipliers { minimum: 1.8, maximum: 2.2 }),
            ("FOR2", WipMultipliers { minimum: 1.5, maximum: 1.8 }),
            ("GRU8", WipMultipliers { minimum: 1.0, maximum: 1.2 }),
            ("POA1", WipMultipliers { minimum: 1.5, maximum: 2.0 }),
            ("REC1", WipMultipliers { minimum: 1.5, maximum: 2.5 }),
            ("REC3", WipMultipliers { minimum: 1.8, maximum: 2.2 }),
            ("BSB1", WipMultipliers { minimum: 1.5, maximum: 1.8 }),
            ("GRU9", WipMultipliers { minimum: 1.8, maximum: 2.2 }),
            ("XCV9", WipMultipliers { minimum: 1.5, maximum: 1.8 }),
        ]);

        let buffer_queues = HashMap::from([
            ("GRU5", BufferQueue::Multizone),
            ("GRU9", BufferQueue::Multismall),
            ("GIG1", BufferQueue::Multismall),
        ]);

        Self {
            default_profiles,
            priority_profiles,
            expedite_profiles,
            wip_multipliers,
            aggregated: &["GRU5"],
            buffer_queues,
        }
    }
}

impl FacilityCatalog {
    /// Whether the facility code appears in the permitted list.
    pub fn is_known(&self, facility: &str) -> bool {
        FACILITIES.contains(&facility)
    }

    /// TRB profiles for a facility, one `Option` per category.
    pub fn trb_profiles(&self, facility: &str) -> TrbProfiles {
        TrbProfiles {
            default: self.default_profiles.get(facility).copied(),
            priority: self.priority_profiles.get(facility).copied(),
            expedite: self.expedite_profiles.get(facility).copied(),
        }
    }

    /// WIP band multipliers for a facility.
    pub fn wip_multipliers(&self, facility: &str) -> Option<WipMultipliers> {
        self.wip_multipliers.get(facility).copied()
    }

    /// Which risk-table exports the facility produces.
    pub fn risk_view(&self, facility: &str) -> RiskView {
        if self.aggregated.contains(&facility) {
            RiskView::Aggregated
        } else {
            RiskView::SinglesMultis
        }
    }

    /// The sortation buffer queue monitored at the facility, if any.
    pub fn buffer_queue(&self, facility: &str) -> Option<BufferQueue> {
        self.buffer_queues.get(facility).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gru5_fully_configured() {
        let catalog = FacilityCatalog::default();
        let trb = catalog.trb_profiles("GRU5");

        let default = trb.default.expect("GRU5 default profile");
        assert_eq!(default.band.to_string(), "90-95");
        assert_eq!(default.lead_time_hours, 2.25);

        let expedite = trb.expedite.expect("GRU5 expedite profile");
        assert_eq!(expedite.band.to_string(), "185-190");
        assert_eq!(expedite.lead_time_hours, 1.5);

        assert_eq!(
            catalog.wip_multipliers("GRU5"),
            Some(WipMultipliers { minimum: 1.8, maximum: 2.2 })
        );
        assert_eq!(catalog.risk_view("GRU5"), RiskView::Aggregated);
        assert_eq!(catalog.buffer_queue("GRU5"), Some(BufferQueue::Multizone));
    }

    #[test]
    fn gig2_is_partially_configured() {
        let catalog = FacilityCatalog::default();
        let trb = catalog.trb_profiles("GIG2");

        assert!(trb.default.is_some());
        assert!(trb.priority.is_none());
        assert!(trb.expedite.is_none());
        assert!(!trb.is_empty());

        assert_eq!(catalog.wip_multipliers("GIG2"), None);
        assert_eq!(catalog.risk_view("GIG2"), RiskView::SinglesMultis);
        assert_eq!(catalog.buffer_queue("GIG2"), None);
    }

    #[test]
    fn unknown_facility_has_nothing() {
        let catalog = FacilityCatalog::default();
        assert!(!catalog.is_known("ZZZ9"));
        assert!(catalog.trb_profiles("ZZZ9").is_empty());
        assert_eq!(catalog.wip_multipliers("ZZZ9"), None);
        assert_eq!(catalog.buffer_queue("ZZZ9"), None);
    }

    #[test]
    fn every_permitted_facility_has_a_default_profile() {
        let catalog = FacilityCatalog::default();
        for facility in FACILITIES {
            assert!(
                catalog.trb_profiles(facility).default.is_some(),
                "{facility} missing default profile"
            );
        }
    }

    #[test]
    fn category_accessor_matches_fields() {
        let catalog = FacilityCatalog::default();
        let trb = catalog.trb_profiles("GRU9");
        assert_eq!(trb.get(AlertCategory::Default), trb.default);
        assert_eq!(trb.get(AlertCategory::Priority), trb.priority);
        assert_eq!(trb.get(AlertCategory::Expedite), trb.expedite);
    }
}
