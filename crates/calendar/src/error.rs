//! Error types for the oos-calendar crate.

/// Error type for all fallible operations in the oos-calendar crate.
///
/// This enum covers validation failures for month numbers, day-within-month
/// values, `MM-DD` labels and observation date strings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum CalendarError {
    /// Returned when a month number is outside the valid range 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The invalid month number that was provided.
        month: u8,
    },

    /// Returned when a day number exceeds the number of days in the given month.
    #[error("invalid day: {day} for month {month} (max {max_day})")]
    InvalidDay {
        /// The invalid day number that was provided.
        day: u8,
        /// The month for which the day is invalid.
        month: u8,
        /// The maximum valid day for the given month.
        max_day: u8,
    },

    /// Returned when a month-day label is not of the form `MM-DD`.
    #[error("invalid month-day label: '{label}' (expected MM-DD)")]
    InvalidMonthDay {
        /// The label that failed to parse.
        label: String,
    },

    /// Returned when an observation date string cannot be parsed.
    #[error("invalid date: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The date string that failed to parse.
        value: String,
    },
}
