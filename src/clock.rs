// Clock capability so "today" is injected rather than read globally

use chrono::{DateTime, Duration, NaiveDate, SubsecRound, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for due-date checks (UTC)
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall clock, truncated to milliseconds
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

/// Settable clock for tests and demos
///
/// Share it by reference (`&FixedClock` is itself a [`Clock`]) to move time
/// forward while a store holds it.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Noon UTC on the given date
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc();
        Self::at(noon)
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }

    pub fn advance_days(&self, days: i64) {
        self.now.set(self.now.get() + Duration::days(days));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_millisecond_precision() {
        let now = SystemClock.now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
        // Should be reasonable timestamp (after year 2020)
        assert!(now.timestamp_millis() > 1_600_000_000_000);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let clock = FixedClock::on(day);
        assert_eq!(clock.today(), day);

        clock.advance_days(1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());

        let by_ref: &FixedClock = &clock;
        assert_eq!(by_ref.today(), clock.today());
    }

    #[test]
    fn test_fixed_clock_set() {
        let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        let later = NaiveDate::from_ymd_opt(2025, 12, 31)
            .unwrap()
            .and_hms_milli_opt(23, 59, 59, 250)
            .unwrap()
            .and_utc();

        clock.set(later);
        assert_eq!(clock.now(), later);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
