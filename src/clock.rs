//! Time source abstraction.
//!
//! The store and the maintenance worker never read the system clock directly;
//! they ask a [`Clock`]. Production code uses [`SystemClock`], tests inject a
//! [`ManualClock`] and move it forward explicitly.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Mutex;

/// Supplies the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar day in the reference timezone (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Reads the operating system's wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use diary::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
/// clock.advance(Duration::hours(49));
/// assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 3, 3, 13, 0, 0).unwrap());
/// ```
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Moves the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += by;
    }

    /// Jumps the clock to an absolute instant.
    pub fn set(&self, to: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Returns midnight (UTC) at the start of `day`.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Returns `true` if `instant` falls within `[day 00:00, day + 24h)`.
pub fn falls_on(instant: DateTime<Utc>, day: NaiveDate) -> bool {
    let start = start_of_day(day);
    instant >= start && instant < start + Duration::hours(24)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_system_clock_is_close_to_utc_now() {
        let before = Utc::now();
        let now = SystemClock.now();
        let after = Utc::now();
        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_manual_clock_set_and_today() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        clock.advance(Duration::seconds(1));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        clock.set(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    }

    #[test]
    fn test_falls_on_is_half_open() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert!(falls_on(Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap(), day));
        assert!(falls_on(Utc.with_ymd_and_hms(2024, 6, 10, 23, 59, 59).unwrap(), day));
        assert!(!falls_on(Utc.with_ymd_and_hms(2024, 6, 11, 0, 0, 0).unwrap(), day));
        assert!(!falls_on(Utc.with_ymd_and_hms(2024, 6, 9, 23, 59, 59).unwrap(), day));
    }
}
