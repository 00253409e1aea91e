//! Date Utilities
//!
//! Day difference between a civil expiration date and "now".

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Frozen clock for deterministic tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// `None` for an impossible date or time
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(Self(date.and_time(time)))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// `ceil((target - now) / 1 day)` with `target` taken at midnight.
///
/// Positive: in the future. Zero: due today. Negative: strictly before today.
pub fn days_until(target: NaiveDate, now: NaiveDateTime) -> i64 {
    let diff_ms = (target.and_time(NaiveTime::MIN) - now).num_milliseconds();
    ceil_div(diff_ms, MILLIS_PER_DAY)
}

/// Same, reading "now" from a clock
pub fn days_until_now(target: NaiveDate, clock: &dyn Clock) -> i64 {
    days_until(target, clock.now())
}

fn ceil_div(a: i64, b: i64) -> i64 {
    let q = a.div_euclid(b);
    if a.rem_euclid(b) == 0 { q } else { q + 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_clock_rejects_impossible_dates() {
        assert!(FixedClock::at(2026, 2, 30, 0, 0).is_none());
        assert!(FixedClock::at(2026, 10, 18, 24, 0).is_none());
        assert!(FixedClock::at(2028, 2, 29, 23, 59).is_some());
    }

    #[test]
    fn test_due_today_is_zero() {
        let clock = FixedClock::at(2026, 10, 18, 15, 45).unwrap();
        assert_eq!(days_until_now(date(2026, 10, 18), &clock), 0);
    }

    #[test]
    fn test_due_today_at_midnight_is_zero() {
        let clock = FixedClock::at(2026, 10, 18, 0, 0).unwrap();
        assert_eq!(days_until_now(date(2026, 10, 18), &clock), 0);
    }

    #[test]
    fn test_tomorrow_is_one() {
        let clock = FixedClock::at(2026, 10, 18, 0, 0).unwrap();
        assert_eq!(days_until_now(date(2026, 10, 19), &clock), 1);
        let late = FixedClock::at(2026, 10, 18, 23, 59).unwrap();
        assert_eq!(days_until_now(date(2026, 10, 19), &late), 1);
    }

    #[test]
    fn test_yesterday_is_negative() {
        let clock = FixedClock::at(2026, 10, 18, 0, 0).unwrap();
        assert_eq!(days_until_now(date(2026, 10, 17), &clock), -1);
        let late = FixedClock::at(2026, 10, 18, 23, 59).unwrap();
        assert_eq!(days_until_now(date(2026, 10, 17), &late), -1);
    }

    #[test]
    fn test_negative_iff_strictly_past() {
        let clock = FixedClock::at(2026, 10, 18, 11, 20).unwrap();
        let today = clock.today();
        for offset in -400i64..=400 {
            let target = today + chrono::Duration::days(offset);
            let days = days_until_now(target, &clock);
            assert_eq!(days < 0, target < today, "offset {}", offset);
            assert_eq!(days, offset);
        }
    }

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(1, 86_400_000), 1);
        assert_eq!(ceil_div(-1, 86_400_000), 0);
        assert_eq!(ceil_div(-86_400_000, 86_400_000), -1);
        assert_eq!(ceil_div(-86_400_001, 86_400_000), -1);
        assert_eq!(ceil_div(0, 86_400_000), 0);
    }
}
