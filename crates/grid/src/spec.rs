//! Hyperparameter grid definition.

use std::fmt;
use std::path::PathBuf;

use oos_detect::{DetectConfig, RollingWindow};
use oos_io::{AdmLevel, ResultLayout, format_threshold};

use crate::error::GridError;

/// One cell of the grid: everything needed to run the detector for every
/// region and to locate the persisted table.
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// Administrative level of the regions.
    pub adm_level: AdmLevel,
    /// Minimum kept run length.
    pub min_oos_run_length: u32,
    /// Out-of-season threshold.
    pub percentage_threshold: f64,
    /// Smoothing half-width.
    pub context_window_days: u32,
    /// Rolling-sum length.
    pub rolling_sum_days: u32,
    /// Rolling-sum policy at year start.
    pub rolling_window: RollingWindow,
}

impl Combination {
    /// Detector configuration for this cell.
    pub fn detect_config(&self) -> DetectConfig {
        DetectConfig::new()
            .with_rolling_sum_days(self.rolling_sum_days)
            .with_context_window_days(self.context_window_days)
            .with_percentage_threshold(self.percentage_threshold)
            .with_min_oos_run_length(self.min_oos_run_length)
            .with_rolling_window(self.rolling_window)
    }

    /// Result file of this cell under `layout`.
    pub fn path(&self, layout: &ResultLayout) -> PathBuf {
        layout.combination_path(
            self.adm_level,
            self.min_oos_run_length,
            self.percentage_threshold,
            self.context_window_days,
        )
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} length{} pct{} win{}",
            self.adm_level,
            self.min_oos_run_length,
            format_threshold(self.percentage_threshold),
            self.context_window_days
        )
    }
}

/// Explicit lists of every grid dimension.
///
/// # Example
///
/// ```
/// use oos_grid::GridSpec;
/// use oos_io::AdmLevel;
///
/// let spec = GridSpec::new()
///     .with_percentage_thresholds(vec![97.0, 99.0])
///     .with_context_window_days(vec![10, 30])
///     .with_adm_levels(vec![AdmLevel::Region])
///     .with_min_oos_run_lengths(vec![30]);
/// assert!(spec.validate().is_ok());
/// assert_eq!(spec.combinations().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    percentage_thresholds: Vec<f64>,
    context_window_days: Vec<u32>,
    adm_levels: Vec<AdmLevel>,
    min_oos_run_lengths: Vec<u32>,
    rolling_sum_days: u32,
    rolling_window: RollingWindow,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl GridSpec {
    /// Creates the production grid.
    ///
    /// Thresholds `95..=99`, windows `10, 15, 20, 25, 30`, all three adm
    /// levels, run lengths `15, 30`, `rolling_sum_days = 5`, partial
    /// rolling windows.
    pub fn new() -> Self {
        Self {
            percentage_thresholds: vec![95.0, 96.0, 97.0, 98.0, 99.0],
            context_window_days: vec![10, 15, 20, 25, 30],
            adm_levels: AdmLevel::ALL.to_vec(),
            min_oos_run_lengths: vec![15, 30],
            rolling_sum_days: 5,
            rolling_window: RollingWindow::Partial,
        }
    }

    /// Sets the thresholds.
    pub fn with_percentage_thresholds(mut self, values: Vec<f64>) -> Self {
        self.percentage_thresholds = values;
        self
    }

    /// Sets the smoothing half-widths.
    pub fn with_context_window_days(mut self, values: Vec<u32>) -> Self {
        self.context_window_days = values;
        self
    }

    /// Sets the adm levels.
    pub fn with_adm_levels(mut self, values: Vec<AdmLevel>) -> Self {
        self.adm_levels = values;
        self
    }

    /// Sets the minimum run lengths.
    pub fn with_min_oos_run_lengths(mut self, values: Vec<u32>) -> Self {
        self.min_oos_run_lengths = values;
        self
    }

    /// Sets the rolling-sum length shared by every cell.
    pub fn with_rolling_sum_days(mut self, days: u32) -> Self {
        self.rolling_sum_days = days;
        self
    }

    /// Sets the rolling-sum policy shared by every cell.
    pub fn with_rolling_window(mut self, window: RollingWindow) -> Self {
        self.rolling_window = window;
        self
    }

    /// Returns the thresholds.
    pub fn percentage_thresholds(&self) -> &[f64] {
        &self.percentage_thresholds
    }

    /// Returns the smoothing half-widths.
    pub fn context_window_days(&self) -> &[u32] {
        &self.context_window_days
    }

    /// Returns the adm levels.
    pub fn adm_levels(&self) -> &[AdmLevel] {
        &self.adm_levels
    }

    /// Returns the minimum run lengths.
    pub fn min_oos_run_lengths(&self) -> &[u32] {
        &self.min_oos_run_lengths
    }

    /// Returns the rolling-sum length.
    pub fn rolling_sum_days(&self) -> u32 {
        self.rolling_sum_days
    }

    /// Every cell, ordered by adm level, run length, threshold, window.
    pub fn combinations(&self) -> Vec<Combination> {
        let mut out = Vec::with_capacity(
            self.adm_levels.len()
                * self.min_oos_run_lengths.len()
                * self.percentage_thresholds.len()
                * self.context_window_days.len(),
        );
        for &adm_level in &self.adm_levels {
            for &min_oos_run_length in &self.min_oos_run_lengths {
                for &percentage_threshold in &self.percentage_thresholds {
                    for &context_window_days in &self.context_window_days {
                        out.push(Combination {
                            adm_level,
                            min_oos_run_length,
                            percentage_threshold,
                            context_window_days,
                            rolling_sum_days: self.rolling_sum_days,
                            rolling_window: self.rolling_window,
                        });
                    }
                }
            }
        }
        out
    }

    /// Validates this grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyGrid`] for an empty dimension and
    /// [`GridError::Detect`] if any cell is not a valid detector
    /// configuration.
    pub fn validate(&self) -> Result<(), GridError> {
        let dims = [
            ("percentage_thresholds", self.percentage_thresholds.is_empty()),
            ("context_window_days", self.context_window_days.is_empty()),
            ("adm_levels", self.adm_levels.is_empty()),
            ("min_oos_run_lengths", self.min_oos_run_lengths.is_empty()),
        ];
        if let Some((dimension, _)) = dims.into_iter().find(|(_, empty)| *empty) {
            return Err(GridError::EmptyGrid { dimension });
        }
        for combo in self.combinations() {
            combo.detect_config().validate()?;
        }
        Ok(())
    }
}
