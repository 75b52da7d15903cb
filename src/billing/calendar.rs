//! Calendar helpers shared by the renewal and cost walks.
//!
//! Month arithmetic clamps the day of month to the last valid day of the target month
//! (Jan 31 + 1 month = Feb 28/29). Results saturate at the chrono date bounds.

use chrono::{Datelike, NaiveDate};

/// Shifts `date` by a signed number of calendar months.
pub fn shift_months(date: NaiveDate, months: i64) -> NaiveDate {
    let base = i64::from(date.year()) * 12 + i64::from(date.month0());
    let index = match base.checked_add(months) {
        Some(index) => index,
        None => return saturate(months),
    };
    let year = index.div_euclid(12);
    let month = (index.rem_euclid(12) + 1) as u32;
    let year = match i32::try_from(year) {
        Ok(year) => year,
        Err(_) => return saturate(months),
    };
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| saturate(months))
}

/// Number of days in the given month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year.saturating_add(1), 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Signed day distance from `from` to `to` (positive when `to` is later).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Calendar period between two dates, decomposed into whole years, months and days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarSpan {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl CalendarSpan {
    /// Decomposes `[start, end]`. Returns the zero span when `end <= start`.
    ///
    /// Whole months are counted the same way cycle boundaries are: month `n` has elapsed once
    /// `shift_months(start, n) <= end`.
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        if end <= start {
            return Self::default();
        }
        let mut months = (i64::from(end.year()) - i64::from(start.year())) * 12
            + (i64::from(end.month()) - i64::from(start.month()));
        if shift_months(start, months) > end {
            months -= 1;
        }
        let months = months.max(0);
        let anchor = shift_months(start, months);
        let days = (end - anchor).num_days().max(0);
        Self {
            years: (months / 12) as u32,
            months: (months % 12) as u32,
            days: days as u32,
        }
    }

    pub fn total_months(&self) -> u32 {
        self.years * 12 + self.months
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }
}

fn saturate(direction: i64) -> NaiveDate {
    if direction >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    }
}
