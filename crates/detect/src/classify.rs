//! Threshold classification and the full single-region pipeline.

use oos_calendar::MonthDay;
use serde::Serialize;
use tracing::debug;

use crate::config::DetectConfig;
use crate::context::{ContextZeroPercentage, compute_context_zero_percentage};
use crate::error::DetectError;
use crate::observation::{RawObservation, parse_observations};
use crate::runs::filter_short_runs;
use crate::zero_pct::compute_zero_percentage;

/// Out-of-season classification of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OosDay {
    /// Calendar day label.
    pub month_day: MonthDay,
    /// Raw zero percentage.
    pub zero_pct: f64,
    /// Smoothed zero percentage.
    pub context_zero_pct: f64,
    /// `context_zero_pct >= percentage_threshold`.
    pub is_out_of_season_raw: bool,
    /// Raw flag with runs shorter than `min_oos_run_length` removed.
    pub is_out_of_season: bool,
}

/// Applies the threshold and the circular run-length filter.
///
/// `context` must be sorted by month-day, as returned by
/// [`compute_context_zero_percentage`].
pub fn classify(context: &[ContextZeroPercentage], config: &DetectConfig) -> Vec<OosDay> {
    let raw: Vec<bool> = context
        .iter()
        .map(|c| c.context_zero_pct >= config.percentage_threshold())
        .collect();
    let filtered = filter_short_runs(&raw, config.min_oos_run_length() as usize);

    context
        .iter()
        .zip(raw.iter().zip(&filtered))
        .map(|(c, (&is_raw, &is_oos))| OosDay {
            month_day: c.month_day,
            zero_pct: c.zero_pct,
            context_zero_pct: c.context_zero_pct,
            is_out_of_season_raw: is_raw,
            is_out_of_season: is_oos,
        })
        .collect()
}

/// Runs the whole detector for one region's raw series.
///
/// # Errors
///
/// Returns a [`DetectError`] if the configuration is invalid or the series
/// fails parsing, validation, or the multi-year requirement.
///
/// # Example
///
/// ```
/// use oos_detect::{DetectConfig, RawObservation, detect_region};
///
/// let mut raw = Vec::new();
/// for year in 2019..=2021 {
///     raw.push(RawObservation::new(format!("{year}-06-01"), 0.0));
///     raw.push(RawObservation::new(format!("{year}-06-02"), 0.0));
/// }
/// let config = DetectConfig::new()
///     .with_rolling_sum_days(1)
///     .with_context_window_days(0)
///     .with_min_oos_run_length(2);
/// let days = detect_region(&raw, &config).unwrap();
/// assert!(days.iter().all(|d| d.is_out_of_season));
/// ```
pub fn detect_region(
    raw: &[RawObservation],
    config: &DetectConfig,
) -> Result<Vec<OosDay>, DetectError> {
    config.validate()?;
    let observations = parse_observations(raw)?;
    let zero_pct = compute_zero_percentage(&observations, config)?;
    let context = compute_context_zero_percentage(&zero_pct, config.context_window_days());
    let days = classify(&context, config);

    debug!(
        n_days = days.len(),
        n_raw = days.iter().filter(|d| d.is_out_of_season_raw).count(),
        n_oos = days.iter().filter(|d| d.is_out_of_season).count(),
        "classified region"
    );
    Ok(days)
}
