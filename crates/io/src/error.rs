//! Error types for oos-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the oos-io crate.
///
/// This enum covers file-system failures, Parquet and Arrow errors, schema
/// and value validation problems, and the grid-search storage conventions
/// (write-once result files, result directories).
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps a file-system error.
    #[error("i/o error at {}: {reason}", path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Wraps an error originating from the Parquet or Arrow libraries.
    #[error("parquet error: {reason}")]
    Parquet {
        /// Description of the underlying Parquet failure.
        reason: String,
    },

    /// Wraps an error originating from the oos-calendar crate.
    #[error("calendar error: {reason}")]
    Calendar {
        /// Description of the underlying calendar failure.
        reason: String,
    },

    /// Returned when one or more validation checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when a required column is not present in a file.
    #[error("column '{name}' not found in {}", path.display())]
    MissingColumn {
        /// Name of the missing column.
        name: String,
        /// Path to the file that was inspected.
        path: PathBuf,
    },

    /// Returned for an administrative level other than 0, 1 or 2.
    #[error("invalid adm level {level}, expected 0, 1 or 2")]
    InvalidAdmLevel {
        /// The offending level.
        level: i64,
    },

    /// Returned when an in-memory source has no table for a country.
    #[error("no exposure data for country '{iso3}'")]
    CountryNotFound {
        /// Requested country code.
        iso3: String,
    },

    /// Returned when a write-once result file already exists.
    #[error("result file already exists: {}", path.display())]
    AlreadyExists {
        /// Path of the existing file.
        path: PathBuf,
    },

    /// Returned when a result directory is missing or holds no Parquet files.
    #[error("no result files found in {}", dir.display())]
    NoResultFiles {
        /// Directory that was searched.
        dir: PathBuf,
    },
}

impl From<parquet::errors::ParquetError> for IoError {
    fn from(e: parquet::errors::ParquetError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<arrow::error::ArrowError> for IoError {
    fn from(e: arrow::error::ArrowError) -> Self {
        IoError::Parquet {
            reason: e.to_string(),
        }
    }
}

impl From<oos_calendar::CalendarError> for IoError {
    fn from(e: oos_calendar::CalendarError) -> Self {
        IoError::Calendar {
            reason: e.to_string(),
        }
    }
}
