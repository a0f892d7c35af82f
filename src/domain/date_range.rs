//! Inclusive date range for a dashboard run.

use crate::domain::error::StockboardError;
use chrono::NaiveDate;
use std::fmt;

/// Earliest start date a user may request.
pub fn min_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Enforces `min_start_date() <= start <= end <= today`.
    pub fn new(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<Self, StockboardError> {
        if start < min_start_date() {
            return Err(StockboardError::InvalidDateRange {
                reason: format!("start date {} is before {}", start, min_start_date()),
            });
        }
        if start > end {
            return Err(StockboardError::InvalidDateRange {
                reason: format!("start date {} is after end date {}", start, end),
            });
        }
        if end > today {
            return Err(StockboardError::InvalidDateRange {
                reason: format!("end date {} is in the future (today is {})", end, today),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn valid_range() {
        let range = DateRange::new(d(2020, 1, 1), d(2020, 12, 31), d(2024, 6, 1)).unwrap();
        assert_eq!(range.start(), d(2020, 1, 1));
        assert_eq!(range.end(), d(2020, 12, 31));
        assert!(range.contains(d(2020, 6, 15)));
        assert!(range.contains(d(2020, 12, 31)));
        assert!(!range.contains(d(2021, 1, 1)));
    }

    #[test]
    fn single_day_range_is_valid() {
        let range = DateRange::new(d(2024, 3, 1), d(2024, 3, 1), d(2024, 6, 1)).unwrap();
        assert!(range.contains(d(2024, 3, 1)));
    }

    #[test]
    fn start_after_end_rejected() {
        let err = DateRange::new(d(2024, 3, 2), d(2024, 3, 1), d(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, StockboardError::InvalidDateRange { .. }));
    }

    #[test]
    fn end_in_future_rejected() {
        let err = DateRange::new(d(2024, 1, 1), d(2024, 6, 2), d(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, StockboardError::InvalidDateRange { .. }));
    }

    #[test]
    fn start_before_floor_rejected() {
        let err = DateRange::new(d(1989, 12, 31), d(2000, 1, 1), d(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, StockboardError::InvalidDateRange { .. }));
        assert!(DateRange::new(d(1990, 1, 1), d(2000, 1, 1), d(2024, 6, 1)).is_ok());
    }

    #[test]
    fn parse_date_format() {
        assert_eq!(parse_date("2010-01-01"), Some(d(2010, 1, 1)));
        assert_eq!(parse_date(" 2010-01-01 "), Some(d(2010, 1, 1)));
        assert_eq!(parse_date("2010/01/01"), None);
    }
}
