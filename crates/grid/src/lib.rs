//! # oos-grid
//!
//! Runs the out-of-season detector over a Cartesian product of
//! hyperparameters and persists one result table per combination.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph TD
//!     A["GridSpec"] -->|"combinations()"| B["Combination"]
//!     B --> C{"file exists?"}
//!     C -->|yes| D["Skipped"]
//!     C -->|no| E["for each country (sequential)"]
//!     E -->|"fetch_country()"| F["ExposureTable"]
//!     F -->|"rayon pool, per region"| G["RegionDetector::detect()"]
//!     G --> H["collect, sort, write_results()"]
//!     H --> I["Computed"]
//! ```
//!
//! Country reads are never concurrent. Inside one country the regions are
//! independent and run on a fixed-size worker pool; a failing region is
//! logged and left out without affecting the others. Result files are
//! write-once, which makes an interrupted grid search resumable by simply
//! running it again.
//!
//! ## Quick Start
//!
//! ```
//! use oos_grid::{GridSpec, Runner, RunnerConfig};
//! use oos_io::{AdmLevel, ExposureRow, ExposureTable, MemorySource, ResultLayout};
//!
//! let rows: Vec<ExposureRow> = (2019..=2021)
//!     .flat_map(|y| {
//!         (1..=28).map(move |d| ExposureRow::new("NE001", 1, format!("{y}-02-{d:02}"), 0.0))
//!     })
//!     .collect();
//! let source = MemorySource::new().with_country("ner", ExposureTable::new(rows));
//!
//! let dir = std::env::temp_dir().join(format!("oos-grid-doc-{}", std::process::id()));
//! let layout = ResultLayout::new(&dir);
//! let spec = GridSpec::new()
//!     .with_percentage_thresholds(vec![99.0])
//!     .with_context_window_days(vec![5])
//!     .with_adm_levels(vec![AdmLevel::Region])
//!     .with_min_oos_run_lengths(vec![15]);
//!
//! let runner = Runner::new(RunnerConfig::default().with_countries(vec!["ner".into()])).unwrap();
//! let summary = runner.run_grid(&source, &layout, &spec).unwrap();
//! assert_eq!(summary.computed, 1);
//! # std::fs::remove_dir_all(&dir).unwrap();
//! ```

mod detector;
mod error;
mod runner;
mod spec;

pub use detector::{OosDetector, RegionDetector};
pub use error::GridError;
pub use runner::{
    CombinationOutcome, CombinationResult, DEFAULT_COUNTRIES, GridSummary, RegionFailure, Runner,
    RunnerConfig,
};
pub use spec::{Combination, GridSpec};
