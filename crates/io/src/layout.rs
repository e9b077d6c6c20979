//! On-disk layout of grid-search result files.

use std::path::{Path, PathBuf};

use crate::adm::AdmLevel;

/// Maps hyperparameter combinations to result file locations.
///
/// ```text
/// {output_dir}/adm{a}/length{l}/adm{a}_length{l}_pct{p}_win{w}.parquet
/// ```
///
/// ```
/// use oos_io::{AdmLevel, ResultLayout};
///
/// let layout = ResultLayout::new("grid_search_results");
/// let path = layout.combination_path(AdmLevel::Region, 30, 99.0, 15);
/// assert_eq!(
///     path.to_str().unwrap(),
///     "grid_search_results/adm1/length30/adm1_length30_pct99_win15.parquet"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLayout {
    output_dir: PathBuf,
}

impl ResultLayout {
    /// Creates a layout rooted at `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Root directory of the layout.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory holding every file of one (adm level, run length) pair.
    pub fn combination_dir(&self, adm_level: AdmLevel, length: u32) -> PathBuf {
        self.output_dir
            .join(adm_level.to_string())
            .join(format!("length{length}"))
    }

    /// Path of the file for one full hyperparameter combination.
    pub fn combination_path(
        &self,
        adm_level: AdmLevel,
        length: u32,
        percentage_threshold: f64,
        context_window_days: u32,
    ) -> PathBuf {
        self.combination_dir(adm_level, length).join(format!(
            "{adm_level}_length{length}_pct{}_win{context_window_days}.parquet",
            format_threshold(percentage_threshold)
        ))
    }
}

/// Integral thresholds print without a decimal point (`99`, not `99.0`).
pub fn format_threshold(threshold: f64) -> String {
    if threshold.fract() == 0.0 && threshold.is_finite() {
        format!("{threshold:.0}")
    } else {
        threshold.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combination_dir() {
        let layout = ResultLayout::new("/out");
        assert_eq!(
            layout.combination_dir(AdmLevel::District, 15),
            PathBuf::from("/out/adm2/length15")
        );
    }

    #[test]
    fn fractional_threshold_in_file_name() {
        let layout = ResultLayout::new("/out");
        let path = layout.combination_path(AdmLevel::Country, 30, 97.5, 10);
        assert_eq!(
            path,
            PathBuf::from("/out/adm0/length30/adm0_length30_pct97.5_win10.parquet")
        );
    }

    #[test]
    fn threshold_formatting() {
        assert_eq!(format_threshold(95.0), "95");
        assert_eq!(format_threshold(0.0), "0");
        assert_eq!(format_threshold(99.25), "99.25");
    }
}
