//! Calendar month marker used for monthly counters and bonus idempotency.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A calendar month, serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month must be in 1..=12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| DomainError::parse(format!("Invalid month key: {}", s)))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| DomainError::parse(format!("Invalid year in month key: {}", s)))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| DomainError::parse(format!("Invalid month in month key: {}", s)))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_takes_year_and_month_from_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert_eq!(MonthKey::of(date).to_string(), "2026-03");
    }

    #[test]
    fn parse_rejects_month_thirteen() {
        assert!("2026-13".parse::<MonthKey>().is_err());
        assert!("2026".parse::<MonthKey>().is_err());
    }

    #[test]
    fn same_month_different_days_are_equal() {
        let a = MonthKey::of(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
        let b = MonthKey::of(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn serde_uses_string_form() {
        let key = MonthKey::new(2026, 9).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2026-09\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
