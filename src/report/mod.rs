pub mod aggregate;
mod dashboard;
mod summary;

pub use aggregate::{DailyPoint, GroupTotal};
pub use dashboard::{build_dashboard, DashboardStats, RecentTransaction};
pub use summary::{build_report, FinancialReport};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{BooksError, Result};

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BooksError::InvalidRange {
                from: start.to_string(),
                to: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// First day of `today`'s month through `today`
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: first_of_month(today),
            end: today,
        }
    }

    /// Build a range from optional `--from`/`--to` arguments, defaulting to month-to-date
    pub fn from_args(from: Option<&str>, to: Option<&str>, today: NaiveDate) -> Result<Self> {
        let default = Self::month_to_date(today);
        let start = from.map(parse_date).transpose()?.unwrap_or(default.start);
        let end = to.map(parse_date).transpose()?.unwrap_or(default.end);
        Self::new(start, end)
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| BooksError::InvalidDate(input.to_string()))
}

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn defaults_to_month_to_date() {
        let range = DateRange::from_args(None, None, date(2024, 3, 18)).unwrap();
        assert_eq!(range.start, date(2024, 3, 1));
        assert_eq!(range.end, date(2024, 3, 18));
    }

    #[test]
    fn explicit_bounds_override_defaults() {
        let range =
            DateRange::from_args(Some("2024-01-15"), Some("2024-02-01"), date(2024, 3, 18)).unwrap();
        assert_eq!(range.start, date(2024, 1, 15));
        assert_eq!(range.end, date(2024, 2, 1));
    }

    #[test]
    fn rejects_inverted_ranges_and_bad_dates() {
        assert!(matches!(
            DateRange::from_args(Some("2024-03-10"), Some("2024-03-01"), date(2024, 3, 18)),
            Err(BooksError::InvalidRange { .. })
        ));
        assert!(matches!(
            DateRange::from_args(Some("03/10/2024"), None, date(2024, 3, 18)),
            Err(BooksError::InvalidDate(_))
        ));
    }

    #[test]
    fn single_day_range_is_valid() {
        let day = date(2024, 2, 29);
        assert_eq!(DateRange::new(day, day).unwrap().start, day);
    }
}
