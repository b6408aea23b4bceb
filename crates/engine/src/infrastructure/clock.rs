//! Clock and random implementations.

use chrono::{DateTime, Utc};
#[cfg(test)]
use chrono::NaiveDate;
use uuid::Uuid;

use crate::infrastructure::ports::{ClockPort, RandomPort};

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRandom;

impl RandomPort for SystemRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        use rand::Rng;
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Fixed clock for testing.
#[cfg(test)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl FixedClock {
    /// Noon UTC on the given day.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
        Self(date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc())
    }
}

#[cfg(test)]
impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed random for testing. The value is clamped into the requested range.
#[cfg(test)]
pub struct FixedRandom(pub i32);

#[cfg(test)]
impl RandomPort for FixedRandom {
    fn gen_range(&self, min: i32, max: i32) -> i32 {
        self.0.clamp(min, max.max(min))
    }

    fn gen_uuid(&self) -> Uuid {
        Uuid::nil()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_stays_in_range() {
        let random = SystemRandom;
        for _ in 0..100 {
            let n = random.gen_range(0, 3);
            assert!((0..=3).contains(&n));
        }
        assert_eq!(random.gen_range(5, 5), 5);
    }

    #[test]
    fn fixed_random_is_clamped() {
        assert_eq!(FixedRandom(9).gen_range(0, 2), 2);
        assert_eq!(FixedRandom(-1).gen_range(0, 2), 0);
    }

    #[test]
    fn fixed_clock_reports_its_day() {
        let clock = FixedClock::on(2026, 2, 3);
        assert_eq!(
            clock.now().date_naive(),
            NaiveDate::from_ymd_opt(2026, 2, 3).unwrap()
        );
    }
}
