//! Configuration for the BIC analysis.

use crate::error::SelectError;

/// Options of [`analyze_grid_results`](crate::analyze_grid_results) and the
/// text report.
///
/// # Example
///
/// ```
/// use oos_select::SelectConfig;
///
/// let config = SelectConfig::new().with_rolling_sum_days(Some(5)).with_top_regions(5);
/// assert_eq!(config.rolling_sum_days(), Some(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectConfig {
    /// Only rows with this rolling-sum length are analysed; `None` keeps all.
    rolling_sum_days: Option<u32>,
    /// Number of per-region best configurations listed in the text report.
    top_regions: usize,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectConfig {
    /// No rolling-sum filter, ten regions in the report.
    pub fn new() -> Self {
        Self {
            rolling_sum_days: None,
            top_regions: 10,
        }
    }

    /// Sets the rolling-sum filter.
    pub fn with_rolling_sum_days(mut self, days: Option<u32>) -> Self {
        self.rolling_sum_days = days;
        self
    }

    /// Sets how many per-region bests the report lists.
    pub fn with_top_regions(mut self, n: usize) -> Self {
        self.top_regions = n;
        self
    }

    /// Rolling-sum filter.
    pub fn rolling_sum_days(&self) -> Option<u32> {
        self.rolling_sum_days
    }

    /// Number of per-region bests in the report.
    pub fn top_regions(&self) -> usize {
        self.top_regions
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::InvalidConfig`] if the rolling-sum filter is zero.
    pub fn validate(&self) -> Result<(), SelectError> {
        if self.rolling_sum_days == Some(0) {
            return Err(SelectError::InvalidConfig {
                field: "rolling_sum_days",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
