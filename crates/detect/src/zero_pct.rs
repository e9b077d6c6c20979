//! Per-year rolling sums and the percentage of dry years per calendar day.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use oos_calendar::MonthDay;
use serde::Serialize;
use tracing::debug;

use crate::config::{DetectConfig, RollingWindow};
use crate::error::DetectError;
use crate::observation::Observation;

/// Percentage of years in which the rolling sum was exactly zero on one
/// calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZeroPercentage {
    /// Calendar day label.
    pub month_day: MonthDay,
    /// Percentage of years (0..=100) with a zero rolling sum.
    pub zero_pct: f64,
}

/// Trailing rolling sums over `values`, one entry per input value.
///
/// Each window is summed directly from its values, so a window of zeros
/// always yields exactly `0.0`. Under [`RollingWindow::Full`] the first
/// `window - 1` entries are `None`.
pub fn rolling_sums(values: &[f64], window: usize, policy: RollingWindow) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            if policy == RollingWindow::Full && i + 1 < window {
                return None;
            }
            let start = (i + 1).saturating_sub(window);
            Some(values[start..=i].iter().sum())
        })
        .collect()
}

/// Computes the zero percentage for every calendar day present in the series.
///
/// Observations are sorted by date and split by calendar year; the rolling
/// sum restarts every January so no value carries over from the previous
/// year. The result is sorted by month-day.
///
/// # Errors
///
/// Returns [`DetectError::EmptySeries`] for an empty series and
/// [`DetectError::InsufficientYears`] when fewer than two distinct years are
/// present.
pub fn compute_zero_percentage(
    observations: &[Observation],
    config: &DetectConfig,
) -> Result<Vec<ZeroPercentage>, DetectError> {
    if observations.is_empty() {
        return Err(DetectError::EmptySeries);
    }

    let mut sorted = observations.to_vec();
    sorted.sort_by_key(|o| o.date);

    let years: BTreeSet<i32> = sorted.iter().map(|o| o.date.year()).collect();
    if years.len() < 2 {
        return Err(DetectError::InsufficientYears { years: years.len() });
    }

    // month_day -> (zero count, total count)
    let mut counts: BTreeMap<MonthDay, (usize, usize)> = BTreeMap::new();
    let window = config.rolling_sum_days() as usize;

    for year_obs in sorted.chunk_by(|a, b| a.date.year() == b.date.year()) {
        let values: Vec<f64> = year_obs.iter().map(|o| o.value).collect();
        let sums = rolling_sums(&values, window, config.rolling_window());
        for (o, sum) in year_obs.iter().zip(sums) {
            let Some(sum) = sum else { continue };
            let entry = counts.entry(MonthDay::from_date(o.date)).or_insert((0, 0));
            if sum == 0.0 {
                entry.0 += 1;
            }
            entry.1 += 1;
        }
    }

    debug!(
        n_years = years.len(),
        n_month_days = counts.len(),
        "computed zero percentages"
    );

    Ok(counts
        .into_iter()
        .map(|(month_day, (zeros, total))| ZeroPercentage {
            month_day,
            zero_pct: zeros as f64 / total as f64 * 100.0,
        })
        .collect())
}
