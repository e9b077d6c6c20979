//! Month-day label and leap-year day-of-year tables.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// Number of days in each month of a leap year (index 0 unused, index 1 = January).
pub(crate) const DAYS_PER_MONTH: [u8; 13] = [0, 31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Leap-year day-of-year on which each month starts (index 0 unused).
pub(crate) const MONTH_START_DOY: [u16; 13] =
    [0, 1, 32, 61, 92, 122, 153, 183, 214, 245, 275, 306, 336];

/// A calendar day with the year stripped, e.g. `03-15`.
///
/// February 29 is a valid label: observations from leap years keep their own
/// slot on the analysis axis. Ordering is chronological, which is also the
/// lexicographic order of the `MM-DD` rendering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct MonthDay {
    month: u8,
    day: u8,
}

impl MonthDay {
    /// Creates a new `MonthDay`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] if `month` is not in 1..=12.
    /// Returns [`CalendarError::InvalidDay`] if `day` is not valid for the
    /// given month of a leap year.
    pub fn new(month: u8, day: u8) -> Result<Self, CalendarError> {
        if !(1..=12).contains(&month) {
            return Err(CalendarError::InvalidMonth { month });
        }
        let max_day = DAYS_PER_MONTH[month as usize];
        if !(1..=max_day).contains(&day) {
            return Err(CalendarError::InvalidDay {
                day,
                month,
                max_day,
            });
        }
        Ok(Self { month, day })
    }

    /// Strips the year from a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        // chrono guarantees month 1..=12 and a day valid for that month.
        Self {
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }

    /// Returns the month (1..=12).
    pub fn month(self) -> u8 {
        self.month
    }

    /// Returns the day within the month (1..=31).
    pub fn day(self) -> u8 {
        self.day
    }

    /// Returns the day-of-year on the leap-year axis (1..=366).
    ///
    /// `01-01` is 1, `02-29` is 60 and `12-31` is 366.
    pub fn doy(self) -> u16 {
        MONTH_START_DOY[self.month as usize] + self.day as u16 - 1
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidMonthDay {
            label: s.to_string(),
        };
        let (m, d) = s.trim().split_once('-').ok_or_else(invalid)?;
        if m.is_empty() || m.len() > 2 || d.is_empty() || d.len() > 2 {
            return Err(invalid());
        }
        let month: u8 = m.parse().map_err(|_| invalid())?;
        let day: u8 = d.parse().map_err(|_| invalid())?;
        Self::new(month, day)
    }
}

impl From<MonthDay> for String {
    fn from(md: MonthDay) -> Self {
        md.to_string()
    }
}

impl TryFrom<String> for MonthDay {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
