//! Calendar month keys.
//!
//! Episodes are addressed as "<FullMonthName> <YYYY>", e.g. "February 2025".
//! Month names are English, matched case-insensitively; abbreviations are
//! rejected.

use chrono::{Datelike, NaiveDateTime};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month '{0}', expected 'Month YYYY'")]
pub struct MonthParseError(String);

/// A (year, month) pair; orders chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,  // 1..=12
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(dt: &NaiveDateTime) -> Self {
        Self { year: dt.year(), month: dt.month() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn contains(&self, dt: &NaiveDateTime) -> bool {
        Self::of(dt) == *self
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:04}", MONTH_NAMES[(self.month - 1) as usize], self.year)
    }
}

impl FromStr for MonthKey {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError(s.to_string());

        let mut parts = s.split_whitespace();
        let (Some(name), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(err());
        };
        if s.trim() != s {
            return Err(err());
        }

        let month = MONTH_NAMES
            .iter()
            .position(|m| m.eq_ignore_ascii_case(name))
            .ok_or_else(err)? as u32
            + 1;

        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        if year == 0 {
            return Err(err());
        }

        Ok(Self { year, month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_month_name() {
        let key: MonthKey = "February 2025".parse().unwrap();
        assert_eq!((key.year(), key.month()), (2025, 2));
        assert_eq!(key.to_string(), "February 2025");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let key: MonthKey = "august 2025".parse().unwrap();
        assert_eq!(key, MonthKey::new(2025, 8).unwrap());
        assert_eq!(key.to_string(), "August 2025");
    }

    #[test]
    fn test_parse_rejects_misspelling_and_iso() {
        assert!("Febuary 2025".parse::<MonthKey>().is_err());
        assert!("2025-02".parse::<MonthKey>().is_err());
        assert!("Feb 2025".parse::<MonthKey>().is_err());
        assert!("February".parse::<MonthKey>().is_err());
        assert!("February 25".parse::<MonthKey>().is_err());
        assert!("February 2025 extra".parse::<MonthKey>().is_err());
        assert!(" February 2025".parse::<MonthKey>().is_err());
        assert!("February 0000".parse::<MonthKey>().is_err());
        assert!("".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_valid_format_far_future() {
        let key: MonthKey = "December 2099".parse().unwrap();
        assert_eq!((key.year(), key.month()), (2099, 12));
    }

    #[test]
    fn test_ordering_is_chronological_not_alphabetical() {
        let mut keys: Vec<MonthKey> = ["August 2025", "February 2025", "December 2024", "April 2025"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        keys.sort();
        let labels: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, ["December 2024", "February 2025", "April 2025", "August 2025"]);
    }

    #[test]
    fn test_contains_is_month_grained() {
        let key = MonthKey::new(2025, 2).unwrap();
        let first = NaiveDateTime::parse_from_str("2025-02-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let last = NaiveDateTime::parse_from_str("2025-02-28 23:59:59", "%Y-%m-%d %H:%M:%S").unwrap();
        let next = NaiveDateTime::parse_from_str("2025-03-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let other_year = NaiveDateTime::parse_from_str("2024-02-10 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert!(key.contains(&first));
        assert!(key.contains(&last));
        assert!(!key.contains(&next));
        assert!(!key.contains(&other_year));
    }

    #[test]
    fn test_new_rejects_out_of_range_month() {
        assert!(MonthKey::new(2025, 0).is_none());
        assert!(MonthKey::new(2025, 13).is_none());
    }
}
