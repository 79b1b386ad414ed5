//! Report period model
//!
//! A contiguous date window (Monday-aligned week or calendar month) used to
//! scope a report query.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// ISO date format used for request parameters, file names and records
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Report kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Weekly,
    Monthly,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Weekly => "weekly",
            ReportKind::Monthly => "monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" | "week" | "w" => Some(ReportKind::Weekly),
            "monthly" | "month" | "m" => Some(ReportKind::Monthly),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportKind::Weekly => "Weekly",
            ReportKind::Monthly => "Monthly",
        }
    }
}

impl Default for ReportKind {
    fn default() -> Self {
        ReportKind::Weekly
    }
}

/// An immutable report window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub kind: ReportKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ReportPeriod {
    /// Seven-day window beginning at `start_date`
    pub fn weekly(start_date: NaiveDate) -> Self {
        Self {
            kind: ReportKind::Weekly,
            start_date,
            end_date: start_date + Duration::days(6),
        }
    }

    /// First to last calendar day of `(year, month)`, month 1-based.
    ///
    /// Returns `None` for an out-of-range month or year.
    pub fn monthly(year: i32, month: u32) -> Option<Self> {
        let start_date = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self {
            kind: ReportKind::Monthly,
            start_date,
            end_date: last_day_of_month(year, month)?,
        })
    }

    pub fn start_iso(&self) -> String {
        self.start_date.format(ISO_DATE_FORMAT).to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end_date.format(ISO_DATE_FORMAT).to_string()
    }

    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    /// 1-based month of the period start
    pub fn month(&self) -> u32 {
        self.start_date.month()
    }

    /// Human readable label, e.g. "Weekly: 2024-03-04 to 2024-03-10"
    pub fn label(&self) -> String {
        format!(
            "{}: {} to {}",
            self.kind.display_name(),
            self.start_iso(),
            self.end_iso()
        )
    }
}

/// Day 0 of the following month, i.e. the last day of `(year, month)`
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_DATE_FORMAT).ok()
}
