//! # oos-detect
//!
//! Out-of-season detection for one administrative region: a daily
//! flood-extent series is reduced to a per-calendar-day flag saying whether
//! that day is structurally dry across the historical record.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["RawObservation[]"] -->|"parse_observations()"| B["Observation[]"]
//!     B -->|"compute_zero_percentage()"| C["ZeroPercentage per MM-DD"]
//!     C -->|"compute_context_zero_percentage()"| D["ContextZeroPercentage"]
//!     D -->|"classify()"| E["OosDay[]"]
//!     E -.->|"filter_short_runs()"| E
//! ```
//!
//! 1. The series is split by calendar year and a trailing rolling sum of
//!    `rolling_sum_days` rows is taken inside each year.
//! 2. For every `MM-DD` label, the share of years whose rolling sum is
//!    exactly zero is the zero percentage.
//! 3. Zero percentages are averaged over a circular window of
//!    `context_window_days` on either side.
//! 4. Days at or above `percentage_threshold` are flagged; runs shorter than
//!    `min_oos_run_length` are then cleared, merging a run that crosses the
//!    December/January boundary.
//!
//! ## Quick Start
//!
//! ```
//! use oos_detect::{DetectConfig, RawObservation, detect_region};
//!
//! let raw: Vec<RawObservation> = (2019..=2021)
//!     .flat_map(|y| {
//!         (1..=10).map(move |d| RawObservation::new(format!("{y}-07-{d:02}"), 0.0))
//!     })
//!     .collect();
//!
//! let config = DetectConfig::new()
//!     .with_rolling_sum_days(1)
//!     .with_context_window_days(2)
//!     .with_percentage_threshold(90.0)
//!     .with_min_oos_run_length(5);
//!
//! let days = detect_region(&raw, &config).unwrap();
//! assert_eq!(days.len(), 10);
//! assert!(days.iter().all(|d| d.is_out_of_season));
//! ```

mod classify;
mod config;
mod context;
mod error;
mod observation;
mod runs;
mod zero_pct;

pub use classify::{OosDay, classify, detect_region};
pub use config::{DetectConfig, RollingWindow};
pub use context::{ContextZeroPercentage, compute_context_zero_percentage};
pub use error::DetectError;
pub use observation::{Observation, RawObservation, parse_observations};
pub use runs::{filter_short_runs, find_runs};
pub use zero_pct::{ZeroPercentage, compute_zero_percentage, rolling_sums};
