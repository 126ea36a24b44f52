//! CPT deadline handling for flowwatch.
//!
//! Risk-table exports label each column with a committed-ship-time in
//! `MM/DD HH:MM` form, without a year. This module normalizes those
//! labels (current year, site offset) and decides whether a deadline
//! is inside its SLA evaluation window.
//!
//! Site clocks run on America/Sao_Paulo, which has been a constant
//! UTC-03:00 since Brazil dropped DST in 2019.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDateTime};

/// Fixed site offset (America/Sao_Paulo, UTC-03:00).
pub fn site_offset() -> FixedOffset {
    // Infallible: the checked constructor only rejects offsets beyond +/-24h.
    FixedOffset::west_opt(3 * 3600).expect("UTC-03:00 is a valid offset")
}

/// Current instant in the site offset.
pub fn site_now() -> DateTime<FixedOffset> {
    chrono::Utc::now().with_timezone(&site_offset())
}

/// Parse a raw CPT label (`"12/31 14:00"`) into a site-local instant.
///
/// The label carries no year, so the current year (from `now`) is
/// attached. Deadlines that cross a year boundary are therefore
/// normalized into the wrong year; the window check then fails closed,
/// which suppresses rather than misfires.
///
/// Returns `None` for malformed labels.
pub fn parse_deadline(raw: &str, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    let with_year = format!("{}/{}", trimmed.get(..5)?, now.year()) + trimmed.get(5..)?;
    let naive = NaiveDateTime::parse_from_str(&with_year, "%m/%d/%Y %H:%M").ok()?;
    naive.and_local_timezone(site_offset()).single()
}

/// Display form of a normalized deadline (`"31/12/2026 14:00"`).
pub fn format_deadline(deadline: DateTime<FixedOffset>) -> String {
    deadline.format("%d/%m/%Y %H:%M").to_string()
}

/// Whether `now` falls inside the evaluation window for a deadline.
///
/// The window is `[deadline - lead_time_hours, deadline]`, inclusive
/// at both ends. Before the window opens the deadline is too far out
/// to act on; after the deadline passes there is nothing left to do.
pub fn within_evaluation_window(
    deadline: DateTime<FixedOffset>,
    lead_time_hours: f64,
    now: DateTime<FixedOffset>,
) -> bool {
    let lead = Duration::milliseconds((lead_time_hours * 3_600_000.0) as i64);
    let window_start = deadline - lead;
    now >= window_start && now <= deadline
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
        site_offset()
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("valid test timestamp")
    }

    #[test]
    fn parse_attaches_current_year_and_offset() {
        let now = at(2026, 8, 5, 10, 0);
        let dt = parse_deadline("08/05 14:00", now).expect("parses");
        assert_eq!(dt, at(2026, 8, 5, 14, 0));
        assert_eq!(dt.offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn parse_tolerates_surrounding_whitespace() {
        let now = at(2026, 8, 5, 10, 0);
        assert_eq!(
            parse_deadline("  08/05 14:00  ", now),
            Some(at(2026, 8, 5, 14, 0))
        );
    }

    #[test]
    fn parse_fails_closed_on_malformed_labels() {
        let now = at(2026, 8, 5, 10, 0);
        for raw in ["", "garbage", "14:00", "13/45 99:99", "8/5 14:00"] {
            assert_eq!(parse_deadline(raw, now), None, "raw = {raw:?}");
        }
    }

    #[test]
    fn window_closed_before_lead_time() {
        // Deadline 3h out, 2.25h lead: window has not opened yet.
        let now = at(2026, 8, 5, 10, 0);
        let deadline = at(2026, 8, 5, 13, 0);
        assert!(!within_evaluation_window(deadline, 2.25, now));
    }

    #[test]
    fn window_open_from_start_until_deadline() {
        let deadline = at(2026, 8, 5, 13, 0);
        // Exactly at window start (2h lead).
        assert!(within_evaluation_window(deadline, 2.0, at(2026, 8, 5, 11, 0)));
        // Deep inside the window.
        assert!(within_evaluation_window(deadline, 2.0, at(2026, 8, 5, 12, 50)));
        // At the deadline itself.
        assert!(within_evaluation_window(deadline, 2.0, at(2026, 8, 5, 13, 0)));
    }

    #[test]
    fn window_closed_after_deadline() {
        let deadline = at(2026, 8, 5, 13, 0);
        assert!(!within_evaluation_window(deadline, 2.0, at(2026, 8, 5, 13, 1)));
    }

    #[test]
    fn fractional_lead_hours() {
        let deadline = at(2026, 8, 5, 13, 0);
        // 1.5h lead: window opens at 11:30.
        assert!(!within_evaluation_window(deadline, 1.5, at(2026, 8, 5, 11, 29)));
        assert!(within_evaluation_window(deadline, 1.5, at(2026, 8, 5, 11, 30)));
    }

    #[test]
    fn display_format_is_day_first() {
        assert_eq!(format_deadline(at(2026, 12, 31, 14, 0)), "31/12/2026 14:00");
    }
}
