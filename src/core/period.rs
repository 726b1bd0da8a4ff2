use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::core::{AppError, Result};

/// Inclusive `[start, end]` range of local wall-clock instants used to sum
/// payments. `end` is the last second of the period (`23:59:59`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevenueWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl RevenueWindow {
    /// Build a window, rejecting `start > end`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if start > end {
            return Err(AppError::validation(format!(
                "start ({}) must be before or equal to end ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole calendar month
    pub fn month(year: i32, month: u32) -> Result<Self> {
        validate_month(month)?;
        let first = date(year, month, 1)?;
        let last = last_day_of_month(year, month)?;
        Ok(Self {
            start: start_of_day(first),
            end: end_of_day(last),
        })
    }

    /// Whole calendar year
    pub fn year(year: i32) -> Result<Self> {
        Ok(Self {
            start: start_of_day(date(year, 1, 1)?),
            end: end_of_day(date(year, 12, 31)?),
        })
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Year/month a report is computed for, with missing parts filled from today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    pub year: i32,
    pub month: u32,
}

impl ReportPeriod {
    pub fn resolve(year: Option<i32>, month: Option<u32>) -> Result<Self> {
        let today = Local::now().date_naive();
        let period = Self {
            year: year.unwrap_or_else(|| today.year()),
            month: month.unwrap_or_else(|| today.month()),
        };
        validate_month(period.month)?;
        Ok(period)
    }

    pub fn month_window(&self) -> Result<RevenueWindow> {
        RevenueWindow::month(self.year, self.month)
    }

    pub fn year_window(&self) -> Result<RevenueWindow> {
        RevenueWindow::year(self.year)
    }
}

/// Current local calendar year
pub fn current_year() -> i32 {
    Local::now().year()
}

pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::validation(format!(
            "month must be between 1 and 12, got {}",
            month
        )));
    }
    Ok(())
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        AppError::validation(format!("Invalid date: {}-{:02}-{:02}", year, month, day))
    })
}

/// December is resolved directly; the following January may not be representable.
fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    if month == 12 {
        return date(year, 12, 31);
    }
    date(year, month + 1, 1)?
        .pred_opt()
        .ok_or_else(|| AppError::validation(format!("Invalid month: {}-{:02}", year, month)))
}

fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(chrono::NaiveTime::MIN)
}

fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(23, 59, 59)
        .unwrap_or_else(|| day.and_time(chrono::NaiveTime::MIN))
}
