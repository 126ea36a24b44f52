//! Threshold band definitions for flowwatch.
//!
//! This module defines the alert verdicts and the three-way band
//! classification used by the CPT risk scanner.

use std::fmt;

/// Verdict for one observation against one alert category.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AlertVerdict {
    /// Value at or below the band lower bound
    #[default]
    Inactive,
    /// Value strictly between the band bounds
    Attention,
    /// Value at or above the band upper bound
    Active,
    /// Evaluation suppressed - the deadline's SLA window is not open
    OutOfWindow,
}

impl AlertVerdict {
    /// Stable label used in messages and the alert log.
    pub fn label(&self) -> &'static str {
        match self {
            AlertVerdict::Inactive => "INACTIVE",
            AlertVerdict::Attention => "ATTENTION",
            AlertVerdict::Active => "ACTIVE",
            AlertVerdict::OutOfWindow => "OUT_OF_WINDOW",
        }
    }
}

/// Inclusive numeric band separating "inactive" from "active".
///
/// Bands are expressed as utilization percentages. The bounds belong
/// to the extreme verdicts: a value equal to `upper` is already
/// active, a value equal to `lower` is still inactive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdBand {
    /// Lower bound (%): at or below is inactive
    pub lower: f64,
    /// Upper bound (%): at or above is active
    pub upper: f64,
}

impl ThresholdBand {
    /// Create a band. Bounds are swapped if given out of order so the
    /// invariant `lower <= upper` always holds.
    pub fn new(lower: f64, upper: f64) -> Self {
        if lower <= upper {
            Self { lower, upper }
        } else {
            Self {
                lower: upper,
                upper: lower,
            }
        }
    }

    /// Classify a utilization value against this band.
    pub fn classify(&self, value: f64) -> AlertVerdict {
        if value >= self.upper {
            AlertVerdict::Active
        } else if value <= self.lower {
            AlertVerdict::Inactive
        } else {
            AlertVerdict::Attention
        }
    }
}

impl fmt::Display for ThresholdBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_extremes() {
        let band = ThresholdBand::new(90.0, 95.0);
        assert_eq!(band.classify(95.0), AlertVerdict::Active);
        assert_eq!(band.classify(90.0), AlertVerdict::Inactive);
        assert_eq!(band.classify(92.5), AlertVerdict::Attention);
    }

    #[test]
    fn values_outside_band() {
        let band = ThresholdBand::new(90.0, 95.0);
        assert_eq!(band.classify(0.0), AlertVerdict::Inactive);
        assert_eq!(band.classify(96.0), AlertVerdict::Active);
        assert_eq!(band.classify(250.0), AlertVerdict::Active);
    }

    #[test]
    fn degenerate_band_has_no_attention_zone() {
        let band = ThresholdBand::new(90.0, 90.0);
        assert_eq!(band.classify(90.0), AlertVerdict::Active);
        assert_eq!(band.classify(89.9), AlertVerdict::Inactive);
    }

    #[test]
    fn swapped_bounds_are_normalized() {
        let band = ThresholdBand::new(95.0, 90.0);
        assert_eq!(band.lower, 90.0);
        assert_eq!(band.upper, 95.0);
    }

    #[test]
    fn display_matches_catalog_notation() {
        assert_eq!(ThresholdBand::new(90.0, 95.0).to_string(), "90-95");
        assert_eq!(ThresholdBand::new(87.0, 90.0).to_string(), "87-90");
    }

    #[test]
    fn classification_is_idempotent() {
        let band = ThresholdBand::new(90.0, 95.0);
        for v in [40.0, 90.0, 92.0, 95.0, 120.0] {
            assert_eq!(band.classify(v), band.classify(v));
        }
    }
}
