//! Period navigation
//!
//! Tracks the active week and month and steps them forward or backward.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::{ReportKind, ReportPeriod};

/// Monday on or before `today`
pub fn week_start(today: NaiveDate) -> NaiveDate {
    let day_of_week = today.weekday().num_days_from_sunday() as i64;
    let diff = if day_of_week == 0 { -6 } else { 1 - day_of_week };
    today + Duration::days(diff)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodNavigator {
    week_start: NaiveDate,
    year: i32,
    /// 1-based
    month: u32,
}

impl PeriodNavigator {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            week_start: week_start(today),
            year: today.year(),
            month: today.month(),
        }
    }

    /// Navigator positioned on the local system date
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    pub fn week_start(&self) -> NaiveDate {
        self.week_start
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next_week(&mut self) {
        self.week_start += Duration::days(7);
    }

    pub fn prev_week(&mut self) {
        self.week_start -= Duration::days(7);
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
    }

    pub fn prev_month(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
    }

    pub fn next(&mut self, kind: ReportKind) {
        match kind {
            ReportKind::Weekly => self.next_week(),
            ReportKind::Monthly => self.next_month(),
        }
    }

    pub fn prev(&mut self, kind: ReportKind) {
        match kind {
            ReportKind::Weekly => self.prev_week(),
            ReportKind::Monthly => self.prev_month(),
        }
    }

    pub fn weekly_period(&self) -> ReportPeriod {
        ReportPeriod::weekly(self.week_start)
    }

    pub fn monthly_period(&self) -> ReportPeriod {
        // month is kept in 1..=12 and year comes from a valid date, so this
        // only fails if navigation walks past chrono's supported range
        ReportPeriod::monthly(self.year, self.month).unwrap_or_else(|| {
            tracing::warn!("Month {}-{} out of range, falling back to current week", self.year, self.month);
            self.weekly_period()
        })
    }

    pub fn period(&self, kind: ReportKind) -> ReportPeriod {
        match kind {
            ReportKind::Weekly => self.weekly_period(),
            ReportKind::Monthly => self.monthly_period(),
        }
    }
}

impl Default for PeriodNavigator {
    fn default() -> Self {
        Self::today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_monday_for_every_weekday() {
        // 2024-03-04 is a Monday
        for offset in 0..7 {
            let today = date(2024, 3, 4) + Duration::days(offset);
            let start = week_start(today);
            assert_eq!(start.weekday(), Weekday::Mon, "today = {}", today);
            assert_eq!(start, date(2024, 3, 4), "today = {}", today);
        }
    }

    #[test]
    fn test_sunday_belongs_to_preceding_week() {
        assert_eq!(week_start(date(2024, 3, 3)), date(2024, 2, 26));
    }

    #[test]
    fn test_week_navigation() {
        let mut nav = PeriodNavigator::new(date(2024, 3, 6));
        nav.next_week();
        assert_eq!(nav.weekly_period().start_date, date(2024, 3, 11));
        nav.prev_week();
        nav.prev_week();
        let period = nav.weekly_period();
        assert_eq!(period.start_date, date(2024, 2, 26));
        assert_eq!(period.end_date, date(2024, 3, 3));
    }

    #[test]
    fn test_month_wraps_forward_past_december() {
        let mut nav = PeriodNavigator::new(date(2023, 12, 15));
        nav.next_month();
        assert_eq!((nav.year(), nav.month()), (2024, 1));
        let period = nav.monthly_period();
        assert_eq!(period.start_date, date(2024, 1, 1));
        assert_eq!(period.end_date, date(2024, 1, 31));
    }

    #[test]
    fn test_month_wraps_backward_past_january() {
        let mut nav = PeriodNavigator::new(date(2024, 1, 10));
        nav.prev_month();
        assert_eq!((nav.year(), nav.month()), (2023, 12));
        assert_eq!(nav.monthly_period().end_date, date(2023, 12, 31));
    }

    #[test]
    fn test_kind_dispatch_leaves_other_window_untouched() {
        let mut nav = PeriodNavigator::new(date(2024, 3, 6));
        nav.next(ReportKind::Monthly);
        assert_eq!(nav.week_start(), date(2024, 3, 4));
        assert_eq!(nav.month(), 4);
        nav.prev(ReportKind::Weekly);
        assert_eq!(nav.week_start(), date(2024, 2, 26));
        assert_eq!(nav.month(), 4);
    }
}
