//! One persisted row of a grid-search result table.

use oos_calendar::MonthDay;

/// Column names of a result table, in file order.
pub const RESULT_COLUMNS: [&str; 13] = [
    "iso3",
    "adm_level",
    "pcode",
    "month_day",
    "zero_pct",
    "context_zero_pct",
    "is_out_of_season_raw",
    "is_out_of_season",
    "rolling_sum_days",
    "context_window_days",
    "percentage_threshold",
    "min_oos_run_length",
    "data",
];

/// Classification of one (region, calendar day) under one hyperparameter
/// combination, annotated with everything needed to analyse it later.
#[derive(Debug, Clone, PartialEq)]
pub struct OosRecord {
    /// Country code the region belongs to.
    pub iso3: String,
    /// Administrative level of the region.
    pub adm_level: u8,
    /// Region identifier.
    pub pcode: String,
    /// Calendar day label.
    pub month_day: MonthDay,
    /// Raw zero percentage.
    pub zero_pct: f64,
    /// Smoothed zero percentage.
    pub context_zero_pct: f64,
    /// Threshold flag before run filtering.
    pub is_out_of_season_raw: bool,
    /// Threshold flag after run filtering.
    pub is_out_of_season: bool,
    /// Rolling-sum length used.
    pub rolling_sum_days: u32,
    /// Smoothing half-width used.
    pub context_window_days: u32,
    /// Threshold used.
    pub percentage_threshold: f64,
    /// Minimum run length used.
    pub min_oos_run_length: u32,
    /// Label of the data source or environment that produced the row.
    pub data: String,
}
