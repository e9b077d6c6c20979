//! Grid search orchestration.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use oos_detect::{DetectConfig, OosDay, RawObservation};
use oos_io::{ExposureSource, IoError, OosRecord, ResultLayout, WriterConfig, write_results};
use rayon::prelude::*;
use tracing::{info, info_span, warn};

use crate::detector::{OosDetector, RegionDetector};
use crate::error::GridError;
use crate::spec::{Combination, GridSpec};

/// Countries analysed by default.
pub const DEFAULT_COUNTRIES: [&str; 10] = [
    "ner", "nga", "cmr", "tcd", "bfa", "eth", "ssd", "som", "mli", "cod",
];

/// Settings shared by every combination of a grid search.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    countries: Vec<String>,
    data_label: String,
    max_workers: usize,
    writer: WriterConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|s| s.to_string()).collect(),
            data_label: "dev".to_string(),
            max_workers: 4,
            writer: WriterConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Sets the countries, fetched in the given order.
    pub fn with_countries(mut self, countries: Vec<String>) -> Self {
        self.countries = countries;
        self
    }

    /// Sets the label stored in the `data` column.
    pub fn with_data_label(mut self, label: impl Into<String>) -> Self {
        self.data_label = label.into();
        self
    }

    /// Sets the worker pool size.
    pub fn with_max_workers(mut self, n: usize) -> Self {
        self.max_workers = n;
        self
    }

    /// Sets the Parquet writer configuration.
    pub fn with_writer(mut self, writer: WriterConfig) -> Self {
        self.writer = writer;
        self
    }

    /// Returns the countries.
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Returns the data label.
    pub fn data_label(&self) -> &str {
        &self.data_label
    }

    /// Returns the worker pool size.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Returns the Parquet writer configuration.
    pub fn writer(&self) -> &WriterConfig {
        &self.writer
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.max_workers == 0 {
            return Err(GridError::InvalidWorkers {
                max_workers: self.max_workers,
            });
        }
        if self.countries.is_empty() {
            return Err(GridError::EmptyGrid {
                dimension: "countries",
            });
        }
        self.writer.validate()?;
        Ok(())
    }
}

/// A region whose detection failed.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFailure {
    /// Country code, upper case.
    pub iso3: String,
    /// Region identifier.
    pub pcode: String,
    /// Error message.
    pub reason: String,
}

/// In-memory result of one combination.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinationResult {
    /// Rows sorted by (iso3, pcode, month_day).
    pub records: Vec<OosRecord>,
    /// Number of regions that succeeded.
    pub n_regions: usize,
    /// Regions that failed and were left out.
    pub failures: Vec<RegionFailure>,
}

/// What happened to one combination during a grid search.
#[derive(Debug, Clone, PartialEq)]
pub enum CombinationOutcome {
    /// Computed and written.
    Computed {
        /// Written file.
        path: PathBuf,
        /// Regions written.
        n_regions: usize,
        /// Regions left out after failing.
        n_failures: usize,
    },
    /// The output file already existed.
    Skipped {
        /// Existing file.
        path: PathBuf,
    },
    /// The combination failed as a whole; nothing was written.
    Failed {
        /// Error message.
        reason: String,
    },
}

/// Counts over a whole grid search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridSummary {
    /// Number of combinations in the grid.
    pub total: usize,
    /// Combinations computed and written by this run.
    pub computed: usize,
    /// Combinations whose file already existed.
    pub skipped: usize,
    /// Combinations that failed.
    pub failed: usize,
    /// Failed regions summed over computed combinations.
    pub region_failures: usize,
    /// Outcome of each combination, in grid order.
    pub outcomes: Vec<(Combination, CombinationOutcome)>,
}

impl GridSummary {
    fn push(&mut self, combo: Combination, outcome: CombinationOutcome) {
        match &outcome {
            CombinationOutcome::Computed { n_failures, .. } => {
                self.computed += 1;
                self.region_failures += n_failures;
            }
            CombinationOutcome::Skipped { .. } => self.skipped += 1,
            CombinationOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push((combo, outcome));
    }
}

/// Runs the detector over countries, regions and grid cells.
///
/// Countries are fetched one after another; the regions of one country are
/// detected in parallel on a pool of `max_workers` threads and collected
/// before the next country is fetched.
pub struct Runner<D: RegionDetector = OosDetector> {
    config: RunnerConfig,
    detector: D,
    pool: rayon::ThreadPool,
}

impl Runner<OosDetector> {
    /// Creates a runner with the standard detector.
    pub fn new(config: RunnerConfig) -> Result<Self, GridError> {
        Self::with_detector(config, OosDetector)
    }
}

impl<D: RegionDetector> Runner<D> {
    /// Creates a runner with a custom detector.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] if the configuration is invalid or the worker
    /// pool cannot be built.
    pub fn with_detector(config: RunnerConfig, detector: D) -> Result<Self, GridError> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.max_workers)
            .thread_name(|i| format!("oos-worker-{i}"))
            .build()
            .map_err(|e| GridError::ThreadPool {
                reason: e.to_string(),
            })?;
        Ok(Self {
            config,
            detector,
            pool,
        })
    }

    /// Returns the detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Returns the runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Computes one combination for every configured country without
    /// writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Detect`] for an invalid cell and
    /// [`GridError::Source`] if a country cannot be fetched. Region failures
    /// are reported in [`CombinationResult::failures`].
    pub fn run_analysis(
        &self,
        source: &dyn ExposureSource,
        combo: &Combination,
    ) -> Result<CombinationResult, GridError> {
        let detect_config = combo.detect_config();
        detect_config.validate()?;

        let mut records = Vec::new();
        let mut failures = Vec::new();
        let mut n_regions = 0;

        for source_iso3 in &self.config.countries {
            let iso3 = source_iso3.to_uppercase();
            let _span = info_span!("country", iso3 = %iso3).entered();

            let table = source
                .fetch_country(source_iso3)
                .map_err(|e| GridError::Source {
                    iso3: source_iso3.clone(),
                    reason: e.to_string(),
                })?
                .filter_adm_level(combo.adm_level);

            let inputs: Vec<(&str, Vec<RawObservation>)> = table
                .regions()
                .into_iter()
                .map(|(pcode, rows)| {
                    let raw = rows
                        .iter()
                        .map(|r| RawObservation::new(r.valid_date.clone(), r.value))
                        .collect();
                    (pcode, raw)
                })
                .collect();

            if inputs.is_empty() {
                warn!(adm_level = %combo.adm_level, "no regions at this adm level");
                continue;
            }

            let detector = &self.detector;
            let results: Vec<(&str, Result<Vec<OosDay>, String>)> = self.pool.install(|| {
                inputs
                    .par_iter()
                    .map(|(pcode, raw)| (*pcode, detect_isolated(detector, raw, &detect_config)))
                    .collect()
            });

            let mut ok = 0;
            for (pcode, result) in results {
                match result {
                    Ok(days) => {
                        ok += 1;
                        records.extend(
                            days.into_iter()
                                .map(|d| self.to_record(&iso3, pcode, combo, d)),
                        );
                    }
                    Err(reason) => {
                        warn!(iso3 = %iso3, pcode = %pcode, error = %reason, "region failed");
                        failures.push(RegionFailure {
                            iso3: iso3.clone(),
                            pcode: pcode.to_string(),
                            reason,
                        });
                    }
                }
            }
            info!(regions = inputs.len(), succeeded = ok, "country done");
            n_regions += ok;
        }

        records.sort_by(|a, b| {
            (&a.iso3, &a.pcode, a.month_day).cmp(&(&b.iso3, &b.pcode, b.month_day))
        });

        Ok(CombinationResult {
            records,
            n_regions,
            failures,
        })
    }

    /// Computes and writes one combination unless its file already exists.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`run_analysis`](Self::run_analysis),
    /// [`GridError::NoRegions`] when every region failed, and
    /// [`GridError::Io`] if the table cannot be written.
    pub fn run_combination(
        &self,
        source: &dyn ExposureSource,
        layout: &ResultLayout,
        combo: &Combination,
    ) -> Result<CombinationOutcome, GridError> {
        let path = combo.path(layout);
        if path.exists() {
            info!(path = %path.display(), "result exists, skipping");
            return Ok(CombinationOutcome::Skipped { path });
        }

        let result = self.run_analysis(source, combo)?;
        if result.n_regions == 0 {
            return Err(GridError::NoRegions {
                combination: combo.to_string(),
            });
        }

        match write_results(&path, &result.records, &self.config.writer) {
            Ok(()) => {}
            Err(IoError::AlreadyExists { .. }) => {
                info!(path = %path.display(), "result appeared while computing, keeping it");
                return Ok(CombinationOutcome::Skipped { path });
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            path = %path.display(),
            rows = result.records.len(),
            regions = result.n_regions,
            failed_regions = result.failures.len(),
            "result written"
        );
        Ok(CombinationOutcome::Computed {
            path,
            n_regions: result.n_regions,
            n_failures: result.failures.len(),
        })
    }

    /// Runs every combination of `spec`, one after another.
    ///
    /// A failing combination is logged and counted; the grid continues and
    /// the combination is retried on the next run since no file was written.
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] only if `spec` is invalid.
    pub fn run_grid(
        &self,
        source: &dyn ExposureSource,
        layout: &ResultLayout,
        spec: &GridSpec,
    ) -> Result<GridSummary, GridError> {
        spec.validate()?;
        let combos = spec.combinations();
        let mut summary = GridSummary {
            total: combos.len(),
            ..GridSummary::default()
        };

        for (i, combo) in combos.into_iter().enumerate() {
            let _span = info_span!("combination", cell = %combo).entered();
            info!(index = i + 1, total = summary.total, "processing combination");

            let outcome = match self.run_combination(source, layout, &combo) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "combination failed");
                    CombinationOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            summary.push(combo, outcome);
        }

        info!(
            total = summary.total,
            computed = summary.computed,
            skipped = summary.skipped,
            failed = summary.failed,
            region_failures = summary.region_failures,
            "grid search finished"
        );
        Ok(summary)
    }

    fn to_record(&self, iso3: &str, pcode: &str, combo: &Combination, day: OosDay) -> OosRecord {
        OosRecord {
            iso3: iso3.to_string(),
            adm_level: combo.adm_level.get(),
            pcode: pcode.to_string(),
            month_day: day.month_day,
            zero_pct: day.zero_pct,
            context_zero_pct: day.context_zero_pct,
            is_out_of_season_raw: day.is_out_of_season_raw,
            is_out_of_season: day.is_out_of_season,
            rolling_sum_days: combo.rolling_sum_days,
            context_window_days: combo.context_window_days,
            percentage_threshold: combo.percentage_threshold,
            min_oos_run_length: combo.min_oos_run_length,
            data: self.config.data_label.clone(),
        }
    }
}

/// Runs the detector for one region, turning a panic into a failure reason.
fn detect_isolated<D: RegionDetector>(
    detector: &D,
    raw: &[RawObservation],
    config: &DetectConfig,
) -> Result<Vec<OosDay>, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| detector.detect(raw, config))) {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(payload) => Err(format!("detector panicked: {}", panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = RunnerConfig::default();
        assert_eq!(cfg.countries().len(), 10);
        assert_eq!(cfg.countries()[0], "ner");
        assert_eq!(cfg.data_label(), "dev");
        assert_eq!(cfg.max_workers(), 4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_workers_rejected() {
        let err = RunnerConfig::default().with_max_workers(0).validate().unwrap_err();
        assert_eq!(err, GridError::InvalidWorkers { max_workers: 0 });
        assert!(Runner::new(RunnerConfig::default().with_max_workers(0)).is_err());
    }

    #[test]
    fn no_countries_rejected() {
        let err = RunnerConfig::default()
            .with_countries(vec![])
            .validate()
            .unwrap_err();
        assert_eq!(err, GridError::EmptyGrid { dimension: "countries" });
    }

    #[test]
    fn summary_counts() {
        let combo = GridSpec::new().combinations().remove(0);
        let mut s = GridSummary::default();
        s.push(
            combo.clone(),
            CombinationOutcome::Computed {
                path: PathBuf::from("a"),
                n_regions: 3,
                n_failures: 2,
            },
        );
        s.push(combo.clone(), CombinationOutcome::Skipped { path: PathBuf::from("b") });
        s.push(combo, CombinationOutcome::Failed { reason: "x".to_string() });
        assert_eq!((s.computed, s.skipped, s.failed, s.region_failures), (1, 1, 1, 2));
    }
}
