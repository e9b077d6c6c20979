//! Daily observation types and input validation.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use oos_calendar::parse_valid_date;

use crate::error::DetectError;

/// One daily flood-extent value as it arrives from a data source, with the
/// date still in its textual form.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    /// Observation date, `YYYY-MM-DD` (a trailing time part is tolerated).
    pub valid_date: String,
    /// Daily flood-extent statistic.
    pub value: f64,
}

impl RawObservation {
    /// Creates a new raw observation.
    pub fn new(valid_date: impl Into<String>, value: f64) -> Self {
        Self {
            valid_date: valid_date.into(),
            value,
        }
    }
}

/// A validated daily observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Observation date.
    pub date: NaiveDate,
    /// Daily flood-extent statistic (finite, non-negative).
    pub value: f64,
}

/// Maximum number of messages kept; the count stays exact.
const MAX_DETAILS: usize = 10;

/// Accumulates validation errors into a single [`DetectError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
    count: usize,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self {
            errors: Vec::new(),
            count: 0,
        }
    }

    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.count += 1;
        if self.errors.len() < MAX_DETAILS {
            self.errors.push(msg.into());
        }
    }

    pub(crate) fn finish(self) -> Result<(), DetectError> {
        if self.count == 0 {
            return Ok(());
        }
        let mut details = self.errors.join("; ");
        if self.count > self.errors.len() {
            details.push_str(&format!("; ... {} more", self.count - self.errors.len()));
        }
        Err(DetectError::Validation {
            count: self.count,
            details,
        })
    }
}

/// Parses and validates one region's raw series.
///
/// Rows keep their input order.
///
/// # Errors
///
/// Returns [`DetectError::InvalidDate`] for the first unparsable date, and
/// [`DetectError::Validation`] if any value is non-finite or negative or a
/// date occurs more than once.
pub fn parse_observations(raw: &[RawObservation]) -> Result<Vec<Observation>, DetectError> {
    let mut out = Vec::with_capacity(raw.len());
    for (row, r) in raw.iter().enumerate() {
        let date = parse_valid_date(&r.valid_date).map_err(|_| DetectError::InvalidDate {
            row,
            value: r.valid_date.clone(),
        })?;
        out.push(Observation {
            date,
            value: r.value,
        });
    }
    validate_observations(&out)?;
    Ok(out)
}

/// Checks values are finite and non-negative and dates are unique.
pub(crate) fn validate_observations(obs: &[Observation]) -> Result<(), DetectError> {
    let mut c = ValidationCollector::new();
    let mut seen = BTreeSet::new();

    for (i, o) in obs.iter().enumerate() {
        if !o.value.is_finite() {
            c.push(format!("non-finite value at row {i}: {}", o.value));
        } else if o.value < 0.0 {
            c.push(format!("negative value at row {i}: {}", o.value));
        }
        if !seen.insert(o.date) {
            c.push(format!("duplicate date at row {i}: {}", o.date));
        }
    }

    c.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_series() {
        let raw = vec![
            RawObservation::new("2020-01-01", 0.0),
            RawObservation::new("2020-01-02 00:00:00", 1.5),
        ];
        let obs = parse_observations(&raw).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[1].date, NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(obs[1].value, 1.5);
    }

    #[test]
    fn malformed_date_fails_with_row() {
        let raw = vec![
            RawObservation::new("2020-01-01", 0.0),
            RawObservation::new("01/02/2020", 0.0),
        ];
        assert_eq!(
            parse_observations(&raw).unwrap_err(),
            DetectError::InvalidDate {
                row: 1,
                value: "01/02/2020".to_string(),
            }
        );
    }

    #[test]
    fn bad_values_are_collected() {
        let raw = vec![
            RawObservation::new("2020-01-01", -1.0),
            RawObservation::new("2020-01-02", f64::NAN),
            RawObservation::new("2020-01-03", 2.0),
        ];
        match parse_observations(&raw).unwrap_err() {
            DetectError::Validation { count, details } => {
                assert_eq!(count, 2);
                assert!(details.contains("negative value at row 0"));
                assert!(details.contains("non-finite value at row 1"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn long_bad_series_keeps_exact_count() {
        let raw: Vec<RawObservation> = (1..=25)
            .map(|d| RawObservation::new(format!("2020-01-{d:02}"), -1.0))
            .collect();
        match parse_observations(&raw).unwrap_err() {
            DetectError::Validation { count, details } => {
                assert_eq!(count, 25);
                assert_eq!(details.matches("negative value").count(), 10);
                assert!(details.ends_with("; ... 15 more"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_dates_rejected() {
        let raw = vec![
            RawObservation::new("2020-01-01", 0.0),
            RawObservation::new("2020-01-01", 0.0),
        ];
        match parse_observations(&raw).unwrap_err() {
            DetectError::Validation { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("duplicate date at row 1"));
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
