//! Error types for the oos-grid crate.

/// Error type for all fallible operations in the oos-grid crate.
///
/// Per-region detector failures never surface here; they are logged and
/// counted by the runner. These variants are the structural failures of a
/// whole combination or of the grid definition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Returned when one dimension of the grid has no values.
    #[error("grid dimension '{dimension}' is empty")]
    EmptyGrid {
        /// Name of the empty dimension.
        dimension: &'static str,
    },

    /// Returned when the worker pool size is zero.
    #[error("max_workers must be >= 1, got {max_workers}")]
    InvalidWorkers {
        /// The invalid pool size.
        max_workers: usize,
    },

    /// Wraps an invalid detector configuration.
    #[error("detect error: {reason}")]
    Detect {
        /// Description of the underlying detector failure.
        reason: String,
    },

    /// Wraps a storage error.
    #[error("io error: {reason}")]
    Io {
        /// Description of the underlying storage failure.
        reason: String,
    },

    /// Returned when a country's exposure cannot be fetched.
    #[error("failed to fetch exposure for '{iso3}': {reason}")]
    Source {
        /// Country code.
        iso3: String,
        /// Description of the source failure.
        reason: String,
    },

    /// Returned when no region of any country produced a result.
    #[error("no region succeeded for {combination}")]
    NoRegions {
        /// Human-readable combination label.
        combination: String,
    },

    /// Returned when the worker pool cannot be built.
    #[error("failed to build worker pool: {reason}")]
    ThreadPool {
        /// Description of the pool failure.
        reason: String,
    },
}

impl From<oos_detect::DetectError> for GridError {
    fn from(e: oos_detect::DetectError) -> Self {
        GridError::Detect {
            reason: e.to_string(),
        }
    }
}

impl From<oos_io::IoError> for GridError {
    fn from(e: oos_io::IoError) -> Self {
        GridError::Io {
            reason: e.to_string(),
        }
    }
}
