//! Error types for the oos-detect crate.

/// Error type for all fallible operations in the oos-detect crate.
///
/// Every variant describes a problem with one region's input series or with
/// the detection parameters; none of them is fatal for a batch of regions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DetectError {
    /// Returned when the observation series is empty.
    #[error("empty observation series")]
    EmptySeries,

    /// Returned when fewer than two distinct years are present.
    ///
    /// Zero percentages are fractions of years, so a single year can only
    /// ever produce 0% or 100%.
    #[error("need at least 2 distinct years of data, got {years}")]
    InsufficientYears {
        /// Number of distinct calendar years in the series.
        years: usize,
    },

    /// Returned when an observation date cannot be parsed.
    #[error("invalid date at row {row}: '{value}'")]
    InvalidDate {
        /// Zero-based row index in the input series.
        row: usize,
        /// The offending date string.
        value: String,
    },

    /// Returned when one or more value checks fail.
    #[error("{count} validation error(s): {details}")]
    Validation {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when `rolling_sum_days` is zero.
    #[error("rolling_sum_days must be >= 1, got {days}")]
    InvalidRollingSumDays {
        /// The invalid window length.
        days: u32,
    },

    /// Returned when the percentage threshold is non-finite or outside 0..=100.
    #[error("percentage_threshold must be within 0..=100, got {threshold}")]
    InvalidThreshold {
        /// The invalid threshold.
        threshold: f64,
    },

    /// Returned when `min_oos_run_length` is zero.
    #[error("min_oos_run_length must be >= 1, got {length}")]
    InvalidRunLength {
        /// The invalid run length.
        length: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_insufficient_years() {
        let err = DetectError::InsufficientYears { years: 1 };
        assert_eq!(err.to_string(), "need at least 2 distinct years of data, got 1");
    }

    #[test]
    fn display_invalid_date() {
        let err = DetectError::InvalidDate {
            row: 4,
            value: "2021/01/05".to_string(),
        };
        assert_eq!(err.to_string(), "invalid date at row 4: '2021/01/05'");
    }

    #[test]
    fn display_validation() {
        let err = DetectError::Validation {
            count: 2,
            details: "a; b".to_string(),
        };
        assert_eq!(err.to_string(), "2 validation error(s): a; b");
    }

    #[test]
    fn display_invalid_threshold() {
        let err = DetectError::InvalidThreshold { threshold: 101.0 };
        assert_eq!(
            err.to_string(),
            "percentage_threshold must be within 0..=100, got 101"
        );
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<DetectError>();
    }
}
