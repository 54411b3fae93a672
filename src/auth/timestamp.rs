//! Timestamp freshness validation.
//!
//! Clients stamp requests with local time in a fixed reference timezone,
//! formatted `ddMMyyyyHHmmss`. A request is fresh if its claimed time is
//! within the configured tolerance of the server clock, in either direction.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};

/// chrono equivalent of the `ddMMyyyyHHmmss` wire format.
const TIMESTAMP_FORMAT: &str = "%d%m%Y%H%M%S";

/// Freshness window: tolerance plus the fixed UTC offset in which client
/// timestamps are interpreted. Constant for the process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct ClockWindow {
    pub tolerance_secs: u64,
    pub utc_offset: FixedOffset,
}

impl ClockWindow {
    pub fn new(tolerance_secs: u64, utc_offset: FixedOffset) -> Self {
        Self {
            tolerance_secs,
            utc_offset,
        }
    }

    /// Check a raw timestamp against the current wall clock.
    ///
    /// A parse failure is indistinguishable from an out-of-window timestamp;
    /// both are simply `false`.
    pub fn is_fresh(&self, raw: &str) -> bool {
        self.is_fresh_at(raw, Utc::now().with_timezone(&self.utc_offset))
    }

    /// Check a raw timestamp against an explicit `now`. The boundary is
    /// inclusive: a timestamp exactly `tolerance_secs` away is fresh.
    pub fn is_fresh_at(&self, raw: &str, now: DateTime<FixedOffset>) -> bool {
        let Ok(parsed) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) else {
            return false;
        };
        // Compare at full precision: `now` carries fractional seconds, and
        // truncating them to whole seconds would widen the window by up to
        // a second on either side.
        let tolerance =
            TimeDelta::try_seconds(self.tolerance_secs as i64).unwrap_or(TimeDelta::MAX);
        (now.naive_local() - parsed).abs() <= tolerance
    }

    /// Format an instant in the wire format (client side of the contract;
    /// used by tests and tooling).
    pub fn format(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.utc_offset)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }

    /// Current wall clock formatted in the wire format.
    pub fn format_now(&self) -> String {
        self.format(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_window(tolerance_secs: u64) -> ClockWindow {
        // Reference timezone used by the deployed gateway (UTC+8)
        ClockWindow::new(tolerance_secs, FixedOffset::east_opt(8 * 3600).unwrap())
    }

    fn fixed_now(window: &ClockWindow) -> DateTime<FixedOffset> {
        window
            .utc_offset
            .with_ymd_and_hms(2024, 3, 15, 12, 30, 45)
            .unwrap()
    }

    #[test]
    fn test_exact_match_is_fresh() {
        let window = test_window(10);
        let now = fixed_now(&window);
        assert!(window.is_fresh_at("15032024123045", now));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let window = test_window(10);
        let now = fixed_now(&window);
        // Exactly 10 seconds in the past and in the future
        assert!(window.is_fresh_at("15032024123035", now));
        assert!(window.is_fresh_at("15032024123055", now));
    }

    #[test]
    fn test_fractional_now_does_not_widen_window() {
        let window = test_window(10);
        // now = 12:30:45.500; stamps carry whole seconds only
        let now = fixed_now(&window) + TimeDelta::milliseconds(500);
        // True difference 10.5s, future and past: outside the window
        assert!(!window.is_fresh_at("15032024123056", now));
        assert!(!window.is_fresh_at("15032024123035", now));
        // True difference 9.5s on both sides: inside
        assert!(window.is_fresh_at("15032024123055", now));
        assert!(window.is_fresh_at("15032024123036", now));
    }

    #[test]
    fn test_one_second_past_boundary_is_stale() {
        let window = test_window(10);
        let now = fixed_now(&window);
        assert!(!window.is_fresh_at("15032024123034", now));
        assert!(!window.is_fresh_at("15032024123056", now));
    }

    #[test]
    fn test_parse_failure_is_not_fresh() {
        let window = test_window(10);
        let now = fixed_now(&window);
        assert!(!window.is_fresh_at("", now));
        assert!(!window.is_fresh_at("not-a-timestamp", now));
        // ISO 8601 is the wrong wire format
        assert!(!window.is_fresh_at("2024-03-15T12:30:45", now));
        // Truncated
        assert!(!window.is_fresh_at("150320241230", now));
        // Trailing garbage
        assert!(!window.is_fresh_at("15032024123045x", now));
    }

    #[test]
    fn test_impossible_date_is_not_fresh() {
        let window = test_window(10);
        let now = fixed_now(&window);
        // Day 32 does not parse
        assert!(!window.is_fresh_at("32032024123045", now));
    }

    #[test]
    fn test_format_round_trips() {
        let window = test_window(10);
        let instant = Utc.with_ymd_and_hms(2024, 3, 15, 4, 30, 45).unwrap();
        let raw = window.format(instant);
        // 04:30:45 UTC is 12:30:45 at UTC+8
        assert_eq!(raw, "15032024123045");
        assert!(window.is_fresh_at(&raw, instant.with_timezone(&window.utc_offset)));
    }

    #[test]
    fn test_format_now_is_fresh() {
        let window = test_window(10);
        assert!(window.is_fresh(&window.format_now()));
    }
}
