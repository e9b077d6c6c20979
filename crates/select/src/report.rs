//! Diagnostic report of one (adm level, length) analysis.

use std::fmt;

use oos_io::{AdmLevel, format_threshold};
use serde::Serialize;

use crate::analysis::{BicRecord, ParamKey};
use crate::error::SelectError;
use crate::summary::{
    CombinationSummary, CommonParameters, OverallStats, ParamBic, Recommendation,
    average_bic_by_params, best_config_per_region, best_overall, combination_summaries,
    find_best_config, most_common_combinations, overall_stats,
};

const RULE_WIDTH: usize = 70;

/// Every diagnostic table of one (adm level, length) analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BicReport {
    pub adm_level: u8,
    pub length: u32,
    /// Number of (region, combination) records analysed.
    pub n_records: usize,
    pub recommendation: Recommendation,
    /// Combinations without a single finite BIC.
    pub skipped: Vec<ParamKey>,
    pub best_overall: Option<BicRecord>,
    pub best_per_region: Vec<BicRecord>,
    pub most_common: CommonParameters,
    pub average_bic: Vec<ParamBic>,
    pub summaries: Vec<CombinationSummary>,
    pub overall: OverallStats,
    /// Per-region bests listed in the text rendering.
    #[serde(skip)]
    pub top_regions: usize,
}

impl BicReport {
    /// Builds the report from the BIC records of one (adm level, length) pair.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::NoValidCombination`] if no combination has a
    /// finite BIC.
    pub fn build(
        records: &[BicRecord],
        adm_level: AdmLevel,
        length: u32,
        top_regions: usize,
    ) -> Result<Self, SelectError> {
        let selection = find_best_config(records, adm_level, length)?;
        Ok(Self {
            adm_level: adm_level.get(),
            length,
            n_records: records.len(),
            recommendation: selection.recommendation,
            skipped: selection.skipped,
            best_overall: best_overall(records).cloned(),
            best_per_region: best_config_per_region(records),
            most_common: most_common_combinations(records),
            average_bic: average_bic_by_params(records),
            summaries: combination_summaries(records),
            overall: overall_stats(records),
            top_regions,
        })
    }

    /// Human-readable text report.
    pub fn render_report(&self) -> String {
        self.to_string()
    }

    /// Pretty JSON of every table.
    ///
    /// Non-finite values serialise as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Serialize`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, SelectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn write_pivot(
        &self,
        f: &mut fmt::Formatter<'_>,
        title: &str,
        value: impl Fn(&CombinationSummary) -> f64,
    ) -> fmt::Result {
        let mut thresholds: Vec<f64> = Vec::new();
        let mut windows: Vec<u32> = Vec::new();
        for s in &self.summaries {
            if !thresholds.contains(&s.percentage_threshold) {
                thresholds.push(s.percentage_threshold);
            }
            if !windows.contains(&s.context_window_days) {
                windows.push(s.context_window_days);
            }
        }
        windows.sort_unstable();

        writeln!(f, "{title} (rows: threshold, columns: window)")?;
        write!(f, "{:>8}", "")?;
        for w in &windows {
            write!(f, "{w:>12}")?;
        }
        writeln!(f)?;
        for &t in &thresholds {
            write!(f, "{:>8}", format_threshold(t))?;
            for &w in &windows {
                let cell = self
                    .summaries
                    .iter()
                    .find(|s| s.percentage_threshold == t && s.context_window_days == w)
                    .map(&value);
                match cell {
                    Some(v) => write!(f, "{v:>12.2}")?,
                    None => write!(f, "{:>12}", "-")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f)
    }
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(f, "{title}")?;
    writeln!(f, "{}", "=".repeat(RULE_WIDTH))
}

fn count_or_dash(v: Option<usize>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn float_or_dash(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

impl fmt::Display for BicReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(
            f,
            &format!(
                "BIC ANALYSIS: adm{} length{} ({} records)",
                self.adm_level, self.length, self.n_records
            ),
        )?;
        writeln!(f)?;

        writeln!(f, "Best overall configuration:")?;
        match &self.best_overall {
            Some(r) => writeln!(
                f,
                "  {} {}  pct={} win={}  k={} n={} SS_W={} BIC={:.2}",
                r.iso3,
                r.pcode,
                format_threshold(r.percentage_threshold),
                r.context_window_days,
                r.k,
                count_or_dash(r.n),
                float_or_dash(r.ss_w),
                r.bic
            )?,
            None => writeln!(f, "  none (no region has a valid run)")?,
        }
        writeln!(f)?;

        writeln!(
            f,
            "Best configuration per region (first {} of {}):",
            self.top_regions.min(self.best_per_region.len()),
            self.best_per_region.len()
        )?;
        writeln!(
            f,
            "  {:<6}{:<14}{:>6}{:>6}{:>6}{:>8}{:>12}",
            "iso3", "pcode", "pct", "win", "k", "n", "BIC"
        )?;
        for r in self.best_per_region.iter().take(self.top_regions) {
            writeln!(
                f,
                "  {:<6}{:<14}{:>6}{:>6}{:>6}{:>8}{:>12.2}",
                r.iso3,
                r.pcode,
                format_threshold(r.percentage_threshold),
                r.context_window_days,
                r.k,
                count_or_dash(r.n),
                r.bic
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Most common thresholds:")?;
        for t in &self.most_common.thresholds {
            writeln!(f, "  {:>6}: {} regions", format_threshold(t.value), t.count)?;
        }
        writeln!(f, "Most common windows:")?;
        for w in &self.most_common.windows {
            writeln!(f, "  {:>6}: {} regions", w.value, w.count)?;
        }
        writeln!(f, "Most common combinations:")?;
        for c in &self.most_common.combinations {
            writeln!(f, "  {}: {} regions", c.value, c.count)?;
        }
        writeln!(f)?;

        writeln!(f, "Average BIC by parameter combination (k > 0 only):")?;
        writeln!(
            f,
            "  {:>6}{:>6}{:>14}{:>14}{:>10}",
            "pct", "win", "median BIC", "mean BIC", "regions"
        )?;
        for a in &self.average_bic {
            writeln!(
                f,
                "  {:>6}{:>6}{:>14.2}{:>14.2}{:>10}",
                format_threshold(a.percentage_threshold),
                a.context_window_days,
                a.median_bic,
                a.avg_bic,
                a.n_regions
            )?;
        }
        writeln!(f)?;

        let rec = &self.recommendation;
        writeln!(f, "Recommended configuration (lowest median BIC):")?;
        writeln!(
            f,
            "  pct={} win={}  median BIC={:.2}  mean BIC={:.2}",
            format_threshold(rec.percentage_threshold),
            rec.context_window_days,
            rec.median_bic,
            rec.avg_bic
        )?;
        if !self.skipped.is_empty() {
            let names: Vec<String> = self.skipped.iter().map(ToString::to_string).collect();
            writeln!(f, "  skipped (no finite BIC): {}", names.join(", "))?;
        }
        writeln!(f)?;

        let o = &self.overall;
        writeln!(f, "Summary statistics ({} records with k > 0):", o.n_valid)?;
        for (name, s) in [("k", o.k), ("n", o.n), ("SS_W", o.ss_w), ("BIC", o.bic)] {
            writeln!(f, "  {name:<5} mean={:>12.2}  std={:>12.2}", s.mean, s.std)?;
        }
        writeln!(f)?;

        heading(f, "PARAMETER COMPARISON")?;
        self.write_pivot(f, "Mean k", |s| s.k.mean)?;
        self.write_pivot(f, "Mean n", |s| s.n.mean)?;
        self.write_pivot(f, "Mean SS_W", |s| s.ss_w.mean)?;
        self.write_pivot(f, "Mean BIC", |s| s.bic.mean)?;
        self.write_pivot(f, "Degenerate regions (k = 0)", |s| s.n_degenerate as f64)
    }
}
