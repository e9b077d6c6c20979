//! # oos-select
//!
//! Scores persisted grid-search results with a Bayesian information
//! criterion and recommends one (threshold, window) combination per
//! (adm level, run length) pair.
//!
//! For one region, the `k` kept out-of-season runs of at least the minimum
//! run length cover `n` days. The within-run sum of squares `SS_W` of the
//! smoothed zero percentage measures how homogeneous those runs are:
//!
//! ```text
//! BIC = k ln(n) + n ln(SS_W / n)
//! ```
//!
//! Regions with `k = 0` have no structure to score and are left out of
//! every aggregate. The recommended combination minimises the median BIC
//! across regions.
//!
//! ## Quick Start
//!
//! ```no_run
//! use oos_io::{AdmLevel, ResultLayout};
//! use oos_select::{SelectConfig, run_comprehensive_analysis};
//!
//! let layout = ResultLayout::new("grid_search_results");
//! let analysis = run_comprehensive_analysis(
//!     &layout,
//!     &AdmLevel::ALL,
//!     &[15, 30],
//!     &SelectConfig::new(),
//! )?;
//! for report in &analysis.reports {
//!     println!("{}", report.render_report());
//! }
//! println!("{}", analysis.to_json()?);
//! # Ok::<(), oos_select::SelectError>(())
//! ```

mod analysis;
mod bic;
mod comprehensive;
mod config;
mod error;
mod report;
mod summary;

pub use analysis::{BicRecord, ParamKey, analyze_grid_results, analyze_records};
pub use bic::{BIC_FLOOR, BicScore, calculate_bic};
pub use comprehensive::{ComprehensiveAnalysis, SkippedAnalysis, run_comprehensive_analysis};
pub use config::SelectConfig;
pub use error::SelectError;
pub use report::BicReport;
pub use summary::{
    CombinationSummary, CommonParameters, Frequency, OverallStats, ParamBic, Recommendation,
    Selection, Spread, average_bic_by_params, best_config_per_region, best_overall,
    combination_summaries, find_best_config, most_common_combinations, overall_stats,
};
