//! Error types for the oos-select crate.

use std::path::PathBuf;

/// Error type for all fallible operations in the oos-select crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectError {
    /// Returned when an (adm level, length) pair has no persisted results.
    #[error("no grid search results in {}", dir.display())]
    MissingResults {
        /// Directory where the result files were expected.
        dir: PathBuf,
    },

    /// Returned when no combination has a finite BIC for any region.
    #[error("no parameter combination with a valid BIC for adm_level={adm_level}, length={length}")]
    NoValidCombination {
        /// Administrative level analysed.
        adm_level: u8,
        /// Minimum run length analysed.
        length: u32,
    },

    /// Returned when a configuration value is out of range.
    #[error("invalid config: {field}: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Wraps a storage error other than missing results.
    #[error("io error: {reason}")]
    Io {
        /// Description of the underlying storage failure.
        reason: String,
    },

    /// Wraps a JSON serialisation error.
    #[error("serialization error: {reason}")]
    Serialize {
        /// Description of the serialisation failure.
        reason: String,
    },
}

impl From<oos_io::IoError> for SelectError {
    fn from(e: oos_io::IoError) -> Self {
        match e {
            oos_io::IoError::NoResultFiles { dir } => SelectError::MissingResults { dir },
            other => SelectError::Io {
                reason: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for SelectError {
    fn from(e: serde_json::Error) -> Self {
        SelectError::Serialize {
            reason: e.to_string(),
        }
    }
}
