//! Circular distance between month-day labels.

use crate::month_day::MonthDay;

/// Length of the cycle used for wraparound distances.
///
/// Labels live on the 366-slot leap-year axis, but the wrap is taken over a
/// 365-day year, so `12-31` and `01-01` are treated as the same position.
pub const CYCLE_DAYS: u16 = 365;

/// Number of days between two labels, going whichever way around the year
/// is shorter.
///
/// ```
/// use oos_calendar::{MonthDay, circular_distance};
///
/// let a: MonthDay = "12-25".parse().unwrap();
/// let b: MonthDay = "01-04".parse().unwrap();
/// assert_eq!(circular_distance(a, b), 9);
/// ```
pub fn circular_distance(a: MonthDay, b: MonthDay) -> u16 {
    let diff = a.doy().abs_diff(b.doy());
    diff.min(CYCLE_DAYS.abs_diff(diff))
}
