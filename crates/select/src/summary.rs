//! Aggregations of per-region BIC records across hyperparameter combinations.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use oos_io::AdmLevel;
use oos_stats::{mean, median, sd, sorted};
use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::{BicRecord, ParamKey};
use crate::error::SelectError;

/// Mean and sample standard deviation of a column.
///
/// Both are NaN for an empty column; `std` is NaN for fewer than two values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread {
    pub mean: f64,
    pub std: f64,
}

impl Spread {
    /// Spread of `values`.
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self {
                mean: f64::NAN,
                std: f64::NAN,
            };
        }
        Self {
            mean: mean(values),
            std: sd(values),
        }
    }
}

/// Descriptive statistics of one (threshold, window) combination.
///
/// `k`, `n`, `ss_w` and `bic` are computed over regions with `k > 0` only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinationSummary {
    pub percentage_threshold: f64,
    pub context_window_days: u32,
    /// Regions scored under the combination.
    pub n_regions: usize,
    /// Regions without any valid run.
    pub n_degenerate: usize,
    pub k: Spread,
    pub n: Spread,
    pub ss_w: Spread,
    pub bic: Spread,
    pub median_bic: f64,
}

/// Statistics over every record with `k > 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallStats {
    /// Records with at least one valid run.
    pub n_valid: usize,
    pub k: Spread,
    pub n: Spread,
    pub ss_w: Spread,
    pub bic: Spread,
}

/// How often a value was a region's best choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frequency<T> {
    pub value: T,
    pub count: usize,
}

/// Frequencies of per-region best parameters, most frequent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonParameters {
    pub thresholds: Vec<Frequency<f64>>,
    pub windows: Vec<Frequency<u32>>,
    pub combinations: Vec<Frequency<ParamKey>>,
}

/// Mean and median BIC of one combination across regions with `k > 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamBic {
    pub percentage_threshold: f64,
    pub context_window_days: u32,
    pub avg_bic: f64,
    pub median_bic: f64,
    /// Regions with `k > 0`.
    pub n_regions: usize,
    /// Regions with `k > 0` and a finite BIC.
    pub n_finite: usize,
}

impl ParamBic {
    /// Threshold and window.
    pub fn params(&self) -> ParamKey {
        ParamKey::new(self.percentage_threshold, self.context_window_days)
    }
}

/// Selected configuration for one (adm level, length) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub adm_level: u8,
    pub length: u32,
    pub percentage_threshold: f64,
    pub context_window_days: u32,
    #[serde(rename = "median_BIC")]
    pub median_bic: f64,
    #[serde(rename = "avg_BIC")]
    pub avg_bic: f64,
}

impl Recommendation {
    /// Threshold and window.
    pub fn params(&self) -> ParamKey {
        ParamKey::new(self.percentage_threshold, self.context_window_days)
    }
}

/// Result of [`find_best_config`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub recommendation: Recommendation,
    /// Combinations without a single finite BIC.
    pub skipped: Vec<ParamKey>,
}

fn by_params(records: &[BicRecord]) -> BTreeMap<ParamKey, Vec<&BicRecord>> {
    let mut groups: BTreeMap<ParamKey, Vec<&BicRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(r.params()).or_default().push(r);
    }
    groups
}

fn columns(records: &[&BicRecord]) -> [Vec<f64>; 4] {
    let valid = records.iter().filter(|r| r.has_structure());
    let k = valid.clone().map(|r| r.k as f64).collect();
    let n = valid.clone().filter_map(|r| r.n).map(|n| n as f64).collect();
    let ss_w = valid.clone().filter_map(|r| r.ss_w).collect();
    let bic = valid.map(|r| r.bic).collect();
    [k, n, ss_w, bic]
}

fn median_or_nan(values: &[f64]) -> f64 {
    if values.is_empty() {
        f64::NAN
    } else {
        median(&sorted(values))
    }
}

/// Descriptive statistics per (threshold, window), in key order.
pub fn combination_summaries(records: &[BicRecord]) -> Vec<CombinationSummary> {
    by_params(records)
        .into_iter()
        .map(|(key, group)| {
            let [k, n, ss_w, bic] = columns(&group);
            CombinationSummary {
                percentage_threshold: key.percentage_threshold,
                context_window_days: key.context_window_days,
                n_regions: group.len(),
                n_degenerate: group.len() - k.len(),
                k: Spread::of(&k),
                n: Spread::of(&n),
                ss_w: Spread::of(&ss_w),
                bic: Spread::of(&bic),
                median_bic: median_or_nan(&bic),
            }
        })
        .collect()
}

/// Statistics over all records with `k > 0`.
pub fn overall_stats(records: &[BicRecord]) -> OverallStats {
    let refs: Vec<&BicRecord> = records.iter().collect();
    let [k, n, ss_w, bic] = columns(&refs);
    OverallStats {
        n_valid: k.len(),
        k: Spread::of(&k),
        n: Spread::of(&n),
        ss_w: Spread::of(&ss_w),
        bic: Spread::of(&bic),
    }
}

/// Lowest-BIC record among those with `k > 0`; the first one wins ties.
pub fn best_overall(records: &[BicRecord]) -> Option<&BicRecord> {
    records
        .iter()
        .filter(|r| r.has_structure())
        .fold(None, |best: Option<&BicRecord>, r| match best {
            Some(b) if b.bic.total_cmp(&r.bic) != Ordering::Greater => Some(b),
            _ => Some(r),
        })
}

/// Lowest-BIC record of every region among those with `k > 0`, sorted by
/// (iso3, pcode). The first record in input order wins ties.
pub fn best_config_per_region(records: &[BicRecord]) -> Vec<BicRecord> {
    let mut best: BTreeMap<(&str, &str), &BicRecord> = BTreeMap::new();
    for r in records.iter().filter(|r| r.has_structure()) {
        best.entry((r.iso3.as_str(), r.pcode.as_str()))
            .and_modify(|b| {
                if r.bic.total_cmp(&b.bic) == Ordering::Less {
                    *b = r;
                }
            })
            .or_insert(r);
    }
    best.into_values().cloned().collect()
}

fn ranked<T>(counts: impl IntoIterator<Item = (T, usize)>) -> Vec<Frequency<T>> {
    let mut out: Vec<Frequency<T>> = counts
        .into_iter()
        .map(|(value, count)| Frequency { value, count })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Frequencies of the threshold, window and combination chosen by each
/// region's best configuration.
///
/// Sorted by count descending; equal counts keep ascending value order.
pub fn most_common_combinations(records: &[BicRecord]) -> CommonParameters {
    let bests = best_config_per_region(records);

    let mut combinations: BTreeMap<ParamKey, usize> = BTreeMap::new();
    let mut windows: BTreeMap<u32, usize> = BTreeMap::new();
    for r in &bests {
        *combinations.entry(r.params()).or_default() += 1;
        *windows.entry(r.context_window_days).or_default() += 1;
    }

    // Keys are ordered by threshold first, so equal thresholds are adjacent.
    let mut thresholds: Vec<(f64, usize)> = Vec::new();
    for (key, &count) in &combinations {
        match thresholds.last_mut() {
            Some((t, c)) if t.total_cmp(&key.percentage_threshold) == Ordering::Equal => {
                *c += count
            }
            _ => thresholds.push((key.percentage_threshold, count)),
        }
    }

    CommonParameters {
        thresholds: ranked(thresholds),
        windows: ranked(windows),
        combinations: ranked(combinations),
    }
}

/// Mean and median BIC per combination over records with `k > 0`, sorted by
/// median, then mean, then (threshold, window).
///
/// Combinations without any `k > 0` record are absent.
pub fn average_bic_by_params(records: &[BicRecord]) -> Vec<ParamBic> {
    let mut out: Vec<ParamBic> = by_params(records)
        .into_iter()
        .filter_map(|(key, group)| {
            let [_, _, _, bic] = columns(&group);
            if bic.is_empty() {
                return None;
            }
            Some(ParamBic {
                percentage_threshold: key.percentage_threshold,
                context_window_days: key.context_window_days,
                avg_bic: mean(&bic),
                median_bic: median_or_nan(&bic),
                n_regions: bic.len(),
                n_finite: bic.iter().filter(|b| b.is_finite()).count(),
            })
        })
        .collect();
    out.sort_by(|a, b| {
        a.median_bic
            .total_cmp(&b.median_bic)
            .then(a.avg_bic.total_cmp(&b.avg_bic))
            .then(a.params().cmp(&b.params()))
    });
    out
}

/// Picks the combination with the lowest median BIC.
///
/// Regions with `k = 0` are excluded. A combination none of whose regions
/// has a finite BIC is skipped with a warning and listed in
/// [`Selection::skipped`].
///
/// # Errors
///
/// Returns [`SelectError::NoValidCombination`] if every combination is
/// skipped.
pub fn find_best_config(
    records: &[BicRecord],
    adm_level: AdmLevel,
    length: u32,
) -> Result<Selection, SelectError> {
    let skipped: Vec<ParamKey> = by_params(records)
        .into_iter()
        .filter(|(_, group)| !group.iter().any(|r| r.has_structure() && r.bic.is_finite()))
        .map(|(key, _)| key)
        .collect();
    for key in &skipped {
        warn!(%adm_level, length, combination = %key, "no finite BIC, combination skipped");
    }

    let best = average_bic_by_params(records)
        .into_iter()
        .find(|p| p.n_finite > 0)
        .ok_or(SelectError::NoValidCombination {
            adm_level: adm_level.get(),
            length,
        })?;
    debug!(
        %adm_level,
        length,
        combination = %best.params(),
        median_bic = best.median_bic,
        "selected combination"
    );

    Ok(Selection {
        recommendation: Recommendation {
            adm_level: adm_level.get(),
            length,
            percentage_threshold: best.percentage_threshold,
            context_window_days: best.context_window_days,
            median_bic: best.median_bic,
            avg_bic: best.avg_bic,
        },
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rec(pcode: &str, threshold: f64, win: u32, k: usize, bic: f64) -> BicRecord {
        BicRecord {
            iso3: "ner".to_string(),
            pcode: pcode.to_string(),
            adm_level: 1,
            rolling_sum_days: 5,
            context_window_days: win,
            percentage_threshold: threshold,
            min_oos_run_length: 30,
            data: "test".to_string(),
            k,
            n: (k > 0).then_some(40 * k),
            ss_w: (k > 0).then_some(12.0),
            bic,
        }
    }

    #[test]
    fn spread_of_empty_is_nan() {
        let s = Spread::of(&[]);
        assert!(s.mean.is_nan() && s.std.is_nan());
        let s = Spread::of(&[1.0, 3.0]);
        assert_relative_eq!(s.mean, 2.0);
        assert_relative_eq!(s.std, 2f64.sqrt());
    }

    #[test]
    fn summaries_exclude_degenerate_regions() {
        let records = vec![
            rec("A", 95.0, 10, 2, -50.0),
            rec("B", 95.0, 10, 0, f64::INFINITY),
            rec("C", 95.0, 10, 1, -30.0),
        ];
        let summaries = combination_summaries(&records);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.n_regions, 3);
        assert_eq!(s.n_degenerate, 1);
        assert_relative_eq!(s.k.mean, 1.5);
        assert_relative_eq!(s.bic.mean, -40.0);
        assert_relative_eq!(s.median_bic, -40.0);
    }

    #[test]
    fn best_per_region_ignores_k_zero() {
        let records = vec![
            rec("A", 95.0, 10, 0, f64::INFINITY),
            rec("A", 99.0, 10, 1, -20.0),
            rec("A", 99.0, 20, 1, -10.0),
            rec("B", 95.0, 10, 1, -5.0),
        ];
        let best = best_config_per_region(&records);
        assert_eq!(best.len(), 2);
        assert_eq!(best[0].params(), ParamKey::new(99.0, 10));
        assert_eq!(best[1].pcode, "B");
    }

    #[test]
    fn best_overall_first_wins_ties() {
        let records = vec![
            rec("A", 95.0, 10, 1, -20.0),
            rec("B", 99.0, 10, 1, -20.0),
            rec("C", 99.0, 10, 0, f64::INFINITY),
        ];
        assert_eq!(best_overall(&records).map(|r| r.pcode.as_str()), Some("A"));
        assert!(best_overall(&records[2..]).is_none());
    }

    #[test]
    fn frequencies_sorted_by_count() {
        let records = vec![
            rec("A", 99.0, 20, 1, -20.0),
            rec("B", 99.0, 20, 1, -20.0),
            rec("C", 95.0, 10, 1, -20.0),
            rec("D", 99.0, 10, 1, -20.0),
        ];
        let common = most_common_combinations(&records);
        assert_eq!(
            common.thresholds,
            vec![
                Frequency { value: 99.0, count: 3 },
                Frequency { value: 95.0, count: 1 }
            ]
        );
        assert_eq!(common.windows[0], Frequency { value: 10, count: 2 });
        assert_eq!(common.windows[1], Frequency { value: 20, count: 2 });
        assert_eq!(common.combinations[0].value, ParamKey::new(99.0, 20));
        assert_eq!(common.combinations[0].count, 2);
    }

    #[test]
    fn ranking_uses_median_not_mean() {
        // 95/10: median -10, mean -40. 99/10: median -20, mean -20.
        let records = vec![
            rec("A", 95.0, 10, 1, -100.0),
            rec("B", 95.0, 10, 1, -10.0),
            rec("C", 95.0, 10, 1, -10.0),
            rec("A", 99.0, 10, 1, -20.0),
            rec("B", 99.0, 10, 1, -20.0),
            rec("C", 99.0, 10, 1, -20.0),
        ];
        let averages = average_bic_by_params(&records);
        assert_eq!(averages[0].params(), ParamKey::new(99.0, 10));
        assert_relative_eq!(averages[1].avg_bic, -40.0);

        let selection = find_best_config(&records, AdmLevel::Region, 30).unwrap();
        assert_eq!(selection.recommendation.percentage_threshold, 99.0);
        assert_eq!(selection.recommendation.context_window_days, 10);
        assert!(selection.skipped.is_empty());
    }

    #[test]
    fn ties_broken_by_mean_then_params() {
        let records = vec![
            rec("A", 99.0, 10, 1, -20.0),
            rec("B", 99.0, 10, 1, -20.0),
            rec("A", 95.0, 30, 1, -20.0),
            rec("B", 95.0, 30, 1, -20.0),
        ];
        let averages = average_bic_by_params(&records);
        assert_eq!(averages[0].params(), ParamKey::new(95.0, 30));
    }

    #[test]
    fn all_infinite_combination_skipped() {
        let records = vec![
            rec("A", 95.0, 10, 3, f64::INFINITY),
            rec("B", 95.0, 10, 0, f64::INFINITY),
            rec("A", 99.0, 15, 1, -8.0),
            rec("B", 99.0, 15, 1, f64::INFINITY),
        ];
        let selection = find_best_config(&records, AdmLevel::Region, 15).unwrap();
        assert_eq!(selection.skipped, vec![ParamKey::new(95.0, 10)]);
        let chosen = &selection.recommendation;
        assert_eq!((chosen.percentage_threshold, chosen.context_window_days), (99.0, 15));
        assert_eq!(chosen.median_bic, f64::INFINITY);
        assert_eq!(chosen.avg_bic, f64::INFINITY);
    }

    #[test]
    fn nothing_finite_is_an_error() {
        let records = vec![
            rec("A", 95.0, 10, 0, f64::INFINITY),
            rec("B", 99.0, 10, 2, f64::INFINITY),
        ];
        let err = find_best_config(&records, AdmLevel::District, 30).unwrap_err();
        assert_eq!(
            err,
            SelectError::NoValidCombination {
                adm_level: 2,
                length: 30
            }
        );
        let err = find_best_config(&[], AdmLevel::District, 30).unwrap_err();
        assert!(matches!(err, SelectError::NoValidCombination { .. }));
    }
}
