//! Parsing of observation date strings.

use chrono::NaiveDate;

use crate::error::CalendarError;

/// Parses an observation date of the form `YYYY-MM-DD`.
///
/// A trailing time component separated by a space or `T`
/// (`2021-03-15 00:00:00`, `2021-03-15T00:00:00Z`) is accepted and ignored,
/// since database exports commonly render dates as midnight timestamps.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDate`] if the date part is not a valid
/// Gregorian calendar date.
pub fn parse_valid_date(value: &str) -> Result<NaiveDate, CalendarError> {
    let trimmed = value.trim();
    let date_part = match trimmed.find([' ', 'T']) {
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| CalendarError::InvalidDate {
        value: value.to_string(),
    })
}
