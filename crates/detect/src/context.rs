//! Circular smoothing of zero percentages over neighbouring calendar days.

use oos_calendar::{MonthDay, circular_distance};
use serde::Serialize;

use crate::zero_pct::ZeroPercentage;

/// Zero percentage of one calendar day together with its smoothed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContextZeroPercentage {
    /// Calendar day label.
    pub month_day: MonthDay,
    /// Raw zero percentage for this day.
    pub zero_pct: f64,
    /// Mean zero percentage over all present days within the context window.
    pub context_zero_pct: f64,
}

/// Averages each day's zero percentage with every present day whose
/// circular distance is at most `window_days`.
///
/// The denominator is the number of days actually inside the window, so
/// sparse series (missing calendar days) are averaged over what exists.
/// The output is sorted by month-day.
pub fn compute_context_zero_percentage(
    zero_pct: &[ZeroPercentage],
    window_days: u32,
) -> Vec<ContextZeroPercentage> {
    let mut days = zero_pct.to_vec();
    days.sort_by_key(|z| z.month_day);

    days.iter()
        .map(|center| {
            let (sum, count) = days
                .iter()
                .filter(|other| {
                    u32::from(circular_distance(center.month_day, other.month_day)) <= window_days
                })
                .fold((0.0, 0usize), |(s, c), other| (s + other.zero_pct, c + 1));
            ContextZeroPercentage {
                month_day: center.month_day,
                zero_pct: center.zero_pct,
                // count >= 1: the center day is always at distance 0.
                context_zero_pct: sum / count as f64,
            }
        })
        .collect()
}
