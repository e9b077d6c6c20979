//! Per-country exposure data sources.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::IoError;
use crate::exposure::ExposureTable;
use crate::parquet_read;

/// A query-by-country provider of daily exposure rows.
///
/// The grid search calls [`fetch_country`](Self::fetch_country) once per
/// country and never concurrently, so implementations may hit a shared
/// backend without extra throttling.
pub trait ExposureSource: Send + Sync {
    /// Returns every exposure row of one country.
    fn fetch_country(&self, iso3: &str) -> Result<ExposureTable, IoError>;
}

/// Reads `{input_dir}/{iso3}.parquet`, with `iso3` lower-cased.
#[derive(Debug, Clone)]
pub struct ParquetSource {
    input_dir: PathBuf,
}

impl ParquetSource {
    /// Creates a source reading from `input_dir`.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    /// Input directory.
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// File holding one country's exposure.
    pub fn country_path(&self, iso3: &str) -> PathBuf {
        self.input_dir
            .join(format!("{}.parquet", iso3.to_lowercase()))
    }
}

impl ExposureSource for ParquetSource {
    fn fetch_country(&self, iso3: &str) -> Result<ExposureTable, IoError> {
        let path = self.country_path(iso3);
        let batches = parquet_read::read_batches(&path)?;
        let rows = parquet_read::batches_to_exposure(&batches, &path)?;
        info!(iso3 = %iso3, rows = rows.len(), path = %path.display(), "fetched exposure");
        Ok(ExposureTable::new(rows))
    }
}

/// In-memory source keyed by lower-cased country code.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<String, ExposureTable>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) one country's table.
    pub fn with_country(mut self, iso3: &str, table: ExposureTable) -> Self {
        self.tables.insert(iso3.to_lowercase(), table);
        self
    }
}

impl ExposureSource for MemorySource {
    fn fetch_country(&self, iso3: &str) -> Result<ExposureTable, IoError> {
        self.tables
            .get(&iso3.to_lowercase())
            .cloned()
            .ok_or_else(|| IoError::CountryNotFound {
                iso3: iso3.to_string(),
            })
    }
}
