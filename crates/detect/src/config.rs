//! Configuration for a single detection run.

use crate::error::DetectError;

/// How the trailing rolling sum treats the first days of each year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RollingWindow {
    /// Partial windows are summed over however many days are available
    /// (minimum one observation).
    #[default]
    Partial,
    /// Only complete windows produce a value; the first `rolling_sum_days - 1`
    /// days of every year are left out of the zero-percentage counts.
    Full,
}

/// Hyperparameters for out-of-season detection in one region.
///
/// # Example
///
/// ```
/// use oos_detect::{DetectConfig, RollingWindow};
///
/// let config = DetectConfig::new()
///     .with_rolling_sum_days(5)
///     .with_context_window_days(15)
///     .with_percentage_threshold(97.0)
///     .with_min_oos_run_length(30)
///     .with_rolling_window(RollingWindow::Partial);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DetectConfig {
    /// Length of the trailing rolling sum, in days.
    rolling_sum_days: u32,
    /// Half-width of the circular smoothing window, in days.
    context_window_days: u32,
    /// Minimum smoothed zero percentage for a day to be out of season.
    percentage_threshold: f64,
    /// Minimum length of a kept out-of-season run, in days.
    min_oos_run_length: u32,
    /// Rolling-sum policy at the start of each year.
    rolling_window: RollingWindow,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectConfig {
    /// Creates a configuration with the production defaults.
    ///
    /// Defaults: `rolling_sum_days = 5`, `context_window_days = 30`,
    /// `percentage_threshold = 99`, `min_oos_run_length = 30`,
    /// `rolling_window = Partial`.
    pub fn new() -> Self {
        Self {
            rolling_sum_days: 5,
            context_window_days: 30,
            percentage_threshold: 99.0,
            min_oos_run_length: 30,
            rolling_window: RollingWindow::Partial,
        }
    }

    /// Sets the rolling-sum length.
    pub fn with_rolling_sum_days(mut self, days: u32) -> Self {
        self.rolling_sum_days = days;
        self
    }

    /// Sets the circular smoothing half-width.
    pub fn with_context_window_days(mut self, days: u32) -> Self {
        self.context_window_days = days;
        self
    }

    /// Sets the out-of-season percentage threshold.
    pub fn with_percentage_threshold(mut self, threshold: f64) -> Self {
        self.percentage_threshold = threshold;
        self
    }

    /// Sets the minimum kept run length.
    pub fn with_min_oos_run_length(mut self, length: u32) -> Self {
        self.min_oos_run_length = length;
        self
    }

    /// Sets the rolling-sum policy.
    pub fn with_rolling_window(mut self, window: RollingWindow) -> Self {
        self.rolling_window = window;
        self
    }

    /// Returns the rolling-sum length.
    pub fn rolling_sum_days(&self) -> u32 {
        self.rolling_sum_days
    }

    /// Returns the circular smoothing half-width.
    pub fn context_window_days(&self) -> u32 {
        self.context_window_days
    }

    /// Returns the out-of-season percentage threshold.
    pub fn percentage_threshold(&self) -> f64 {
        self.percentage_threshold
    }

    /// Returns the minimum kept run length.
    pub fn min_oos_run_length(&self) -> u32 {
        self.min_oos_run_length
    }

    /// Returns the rolling-sum policy.
    pub fn rolling_window(&self) -> RollingWindow {
        self.rolling_window
    }

    /// Validates this configuration.
    ///
    /// Returns an error if `rolling_sum_days < 1`, `min_oos_run_length < 1`,
    /// or the threshold is non-finite or outside `0..=100`.
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.rolling_sum_days < 1 {
            return Err(DetectError::InvalidRollingSumDays {
                days: self.rolling_sum_days,
            });
        }
        if !self.percentage_threshold.is_finite()
            || !(0.0..=100.0).contains(&self.percentage_threshold)
        {
            return Err(DetectError::InvalidThreshold {
                threshold: self.percentage_threshold,
            });
        }
        if self.min_oos_run_length < 1 {
            return Err(DetectError::InvalidRunLength {
                length: self.min_oos_run_length,
            });
        }
        Ok(())
    }
}
