use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RewardsError};

/// Inclusive range of Unix timestamps (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(RewardsError::InvalidWindow(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Window covering a calendar quarter, from 00:00:00 UTC on its first day
    /// to 23:59:59 UTC on its last day.
    pub fn for_quarter(year: i32, quarter: Quarter) -> Result<Self> {
        if !(1000..=9999).contains(&year) {
            return Err(RewardsError::InvalidWindow(format!(
                "year must have four digits, got {}",
                year
            )));
        }

        let (first_month, last_month, last_day) = quarter.bounds();
        let start = NaiveDate::from_ymd_opt(year, first_month, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| {
                RewardsError::InvalidWindow(format!("no start date for {} {}", year, quarter))
            })?;
        let end = NaiveDate::from_ymd_opt(year, last_month, last_day)
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .ok_or_else(|| {
                RewardsError::InvalidWindow(format!("no end date for {} {}", year, quarter))
            })?;

        Self::new(start.and_utc().timestamp(), end.and_utc().timestamp())
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    pub fn start_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.start, 0)
    }

    pub fn end_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.end, 0)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start_datetime(), self.end_datetime()) {
            (Some(start), Some(end)) => write!(
                f,
                "{} to {}",
                start.format("%Y-%m-%dT%H:%M:%SZ"),
                end.format("%Y-%m-%dT%H:%M:%SZ")
            ),
            _ => write!(f, "{} to {}", self.start, self.end),
        }
    }
}

/// Calendar quarter of a year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// (first month, last month, last day of last month)
    fn bounds(&self) -> (u32, u32, u32) {
        match self {
            Quarter::Q1 => (1, 3, 31),
            Quarter::Q2 => (4, 6, 30),
            Quarter::Q3 => (7, 9, 30),
            Quarter::Q4 => (10, 12, 31),
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quarter::Q1 => write!(f, "Q1"),
            Quarter::Q2 => write!(f, "Q2"),
            Quarter::Q3 => write!(f, "Q3"),
            Quarter::Q4 => write!(f, "Q4"),
        }
    }
}

impl FromStr for Quarter {
    type Err = RewardsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().trim_start_matches('Q') {
            "1" => Ok(Quarter::Q1),
            "2" => Ok(Quarter::Q2),
            "3" => Ok(Quarter::Q3),
            "4" => Ok(Quarter::Q4),
            _ => Err(RewardsError::InvalidWindow(format!("invalid quarter: {}", s))),
        }
    }
}
