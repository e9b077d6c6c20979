//! Per-region BIC scores read back from persisted grid-search results.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use oos_io::{AdmLevel, OosRecord, ResultLayout, format_threshold, read_result_dir};
use serde::Serialize;
use tracing::info;

use crate::bic::calculate_bic;
use crate::config::SelectConfig;
use crate::error::SelectError;

/// The (threshold, window) pair that the selector ranks.
///
/// Ordered by threshold, then window. Thresholds compare with
/// [`f64::total_cmp`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamKey {
    /// Percentage threshold.
    pub percentage_threshold: f64,
    /// Context window half-width, in days.
    pub context_window_days: u32,
}

impl ParamKey {
    /// Creates a key.
    pub fn new(percentage_threshold: f64, context_window_days: u32) -> Self {
        Self {
            percentage_threshold,
            context_window_days,
        }
    }
}

impl PartialEq for ParamKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParamKey {}

impl PartialOrd for ParamKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParamKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.percentage_threshold
            .total_cmp(&other.percentage_threshold)
            .then(self.context_window_days.cmp(&other.context_window_days))
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pct{} win{}",
            format_threshold(self.percentage_threshold),
            self.context_window_days
        )
    }
}

/// BIC of one region under one hyperparameter combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BicRecord {
    pub iso3: String,
    pub pcode: String,
    pub adm_level: u8,
    pub rolling_sum_days: u32,
    pub context_window_days: u32,
    pub percentage_threshold: f64,
    pub min_oos_run_length: u32,
    pub data: String,
    /// Number of valid runs.
    pub k: usize,
    /// Days across valid runs; `None` when `k = 0`.
    pub n: Option<usize>,
    /// Within-run sum of squares; `None` when `k = 0`.
    pub ss_w: Option<f64>,
    /// BIC, `+inf` for degenerate fits.
    pub bic: f64,
}

impl BicRecord {
    /// Threshold and window of the record.
    pub fn params(&self) -> ParamKey {
        ParamKey::new(self.percentage_threshold, self.context_window_days)
    }

    /// `true` when the region has at least one valid run.
    pub fn has_structure(&self) -> bool {
        self.k > 0
    }
}

/// Computes one [`BicRecord`] per (iso3, pcode, threshold, window) group of
/// `records` at `adm_level`.
///
/// Rows of a group are scored in month-day order. Output is sorted by the
/// group key.
pub fn analyze_records(
    records: &[OosRecord],
    adm_level: AdmLevel,
    config: &SelectConfig,
) -> Vec<BicRecord> {
    let mut groups: BTreeMap<(&str, &str, ParamKey), Vec<&OosRecord>> = BTreeMap::new();
    for r in records.iter().filter(|r| {
        r.adm_level == adm_level.get()
            && config
                .rolling_sum_days()
                .is_none_or(|days| r.rolling_sum_days == days)
    }) {
        let key = ParamKey::new(r.percentage_threshold, r.context_window_days);
        groups
            .entry((r.iso3.as_str(), r.pcode.as_str(), key))
            .or_default()
            .push(r);
    }

    groups
        .into_values()
        .map(|mut rows| {
            rows.sort_by_key(|r| r.month_day);
            let first = rows[0];
            let pct: Vec<f64> = rows.iter().map(|r| r.context_zero_pct).collect();
            let flags: Vec<bool> = rows.iter().map(|r| r.is_out_of_season).collect();
            let score = calculate_bic(&pct, &flags, first.min_oos_run_length as usize);
            BicRecord {
                iso3: first.iso3.clone(),
                pcode: first.pcode.clone(),
                adm_level: first.adm_level,
                rolling_sum_days: first.rolling_sum_days,
                context_window_days: first.context_window_days,
                percentage_threshold: first.percentage_threshold,
                min_oos_run_length: first.min_oos_run_length,
                data: first.data.clone(),
                k: score.k,
                n: score.n,
                ss_w: score.ss_w,
                bic: score.bic,
            }
        })
        .collect()
}

/// Reads every result file of one (adm level, length) pair and scores it.
///
/// Never writes.
///
/// # Errors
///
/// Returns [`SelectError::MissingResults`] if the pair has no result files,
/// [`SelectError::InvalidConfig`] for an invalid `config`, and
/// [`SelectError::Io`] if a file cannot be decoded.
pub fn analyze_grid_results(
    layout: &ResultLayout,
    adm_level: AdmLevel,
    length: u32,
    config: &SelectConfig,
) -> Result<Vec<BicRecord>, SelectError> {
    config.validate()?;
    let dir = layout.combination_dir(adm_level, length);
    let rows = read_result_dir(&dir)?;
    let records = analyze_records(&rows, adm_level, config);
    info!(
        %adm_level,
        length,
        rows = rows.len(),
        records = records.len(),
        degenerate = records.iter().filter(|r| !r.has_structure()).count(),
        "computed BIC records"
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oos_io::OosRecord;

    fn row(pcode: &str, md: &str, pct: f64, oos: bool, threshold: f64, win: u32) -> OosRecord {
        OosRecord {
            iso3: "ner".to_string(),
            adm_level: 1,
            pcode: pcode.to_string(),
            month_day: md.parse().unwrap(),
            zero_pct: pct,
            context_zero_pct: pct,
            is_out_of_season_raw: oos,
            is_out_of_season: oos,
            rolling_sum_days: 5,
            context_window_days: win,
            percentage_threshold: threshold,
            min_oos_run_length: 2,
            data: "test".to_string(),
        }
    }

    #[test]
    fn param_key_order() {
        let mut keys = vec![
            ParamKey::new(99.0, 10),
            ParamKey::new(95.0, 30),
            ParamKey::new(95.0, 10),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ParamKey::new(95.0, 10),
                ParamKey::new(95.0, 30),
                ParamKey::new(99.0, 10)
            ]
        );
        assert_eq!(ParamKey::new(97.5, 15).to_string(), "pct97.5 win15");
    }

    #[test]
    fn groups_scored_in_month_day_order() {
        // Shuffled input; in calendar order the run is 01-02..01-04.
        let rows = vec![
            row("NE001", "01-04", 99.0, true, 95.0, 10),
            row("NE001", "01-01", 10.0, false, 95.0, 10),
            row("NE001", "01-03", 100.0, true, 95.0, 10),
            row("NE001", "01-05", 20.0, false, 95.0, 10),
            row("NE001", "01-02", 98.0, true, 95.0, 10),
        ];
        let records = analyze_records(&rows, AdmLevel::Region, &SelectConfig::new());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].k, 1);
        assert_eq!(records[0].n, Some(3));
    }

    #[test]
    fn one_record_per_region_and_combination() {
        let mut rows = Vec::new();
        for pcode in ["NE002", "NE001"] {
            for (threshold, win) in [(99.0, 10), (95.0, 10)] {
                rows.push(row(pcode, "01-01", 99.0, true, threshold, win));
                rows.push(row(pcode, "01-02", 99.0, true, threshold, win));
            }
        }
        let records = analyze_records(&rows, AdmLevel::Region, &SelectConfig::new());
        let keys: Vec<(&str, f64)> = records
            .iter()
            .map(|r| (r.pcode.as_str(), r.percentage_threshold))
            .collect();
        assert_eq!(
            keys,
            vec![("NE001", 95.0), ("NE001", 99.0), ("NE002", 95.0), ("NE002", 99.0)]
        );
    }

    #[test]
    fn other_levels_and_rolling_lengths_filtered() {
        let mut other_level = row("NE", "01-01", 99.0, true, 95.0, 10);
        other_level.adm_level = 0;
        let mut other_rolling = row("NE001", "01-01", 99.0, true, 95.0, 10);
        other_rolling.rolling_sum_days = 3;
        let rows = vec![
            other_level,
            other_rolling,
            row("NE002", "01-01", 99.0, true, 95.0, 10),
        ];
        let config = SelectConfig::new().with_rolling_sum_days(Some(5));
        let records = analyze_records(&rows, AdmLevel::Region, &config);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pcode, "NE002");
    }
}
