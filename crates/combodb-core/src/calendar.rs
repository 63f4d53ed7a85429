//! Serving-date windows and date formatting.
//!
//! All calendar math is done in UTC.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Number of day slots in the upcoming-week view.
pub const WEEK_SLOTS: u64 = 7;

/// Input formats accepted by [`parse_flexible_date`], tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y%m%d",
    "%d-%m-%Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
];

/// The window of serving dates considered "this week".
///
/// Covers the calendar days `today + 1` through `today + 7` in UTC, the same
/// days [`upcoming_days`] returns, whatever the time of day of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl DateWindow {
    #[must_use]
    pub fn following(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        Self {
            first_day: today.checked_add_days(Days::new(1)).unwrap_or(today),
            last_day: today.checked_add_days(Days::new(WEEK_SLOTS)).unwrap_or(today),
        }
    }

    /// Tomorrow, relative to the instant the window was built from.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Seven days after today; inclusive.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }
}

/// The seven calendar days following `now`'s date, tomorrow first.
#[must_use]
pub fn upcoming_days(now: DateTime<Utc>) -> Vec<NaiveDate> {
    let today = now.date_naive();
    (1..=WEEK_SLOTS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .collect()
}

/// Format a serving date as `"yyyy-MM-dd, Weekday"`, e.g. `"2020-11-21, Saturday"`.
#[must_use]
pub fn format_serving_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d, %A").to_string()
}

/// Parse a date typed by an operator in any of the commonly used layouts
/// (`20201121`, `21-11-2020`, `2020-11-21`, `11/21/2020`, `2020/11/21`,
/// `21 Nov 2020`, `21 November 2020`).
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] if the input is blank or matches
/// none of the accepted layouts.
pub fn parse_flexible_date(input: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidArgument(
            "date cannot be empty".to_string(),
        ));
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| CoreError::InvalidArgument(format!("unrecognized date format: '{trimmed}'")))
}
