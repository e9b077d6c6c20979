//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`IoError::Validation`], plus the row checks applied to
//! result tables before they are written.

use crate::error::IoError;
use crate::record::OosRecord;

/// Maximum number of messages kept per check; the count stays exact.
const MAX_DETAILS: usize = 10;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
    count: usize,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self {
            errors: Vec::new(),
            count: 0,
        }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.count += 1;
        if self.errors.len() < MAX_DETAILS {
            self.errors.push(msg.into());
        }
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.count == 0 {
            return Ok(());
        }
        let mut details = self.errors.join("; ");
        if self.count > self.errors.len() {
            details.push_str(&format!("; ... {} more", self.count - self.errors.len()));
        }
        Err(IoError::Validation {
            count: self.count,
            details,
        })
    }
}

// ---------------------------------------------------------------------------
// Result rows
// ---------------------------------------------------------------------------

fn is_percentage(v: f64) -> bool {
    v.is_finite() && (0.0..=100.0).contains(&v)
}

/// Checks percentages are within 0..=100, identifiers are non-empty, and
/// the filtered flag never exceeds the raw flag.
pub(crate) fn validate_records(records: &[OosRecord]) -> ValidationCollector {
    let mut c = ValidationCollector::new();

    for (i, r) in records.iter().enumerate() {
        if r.iso3.is_empty() || r.pcode.is_empty() {
            c.push(format!("empty iso3 or pcode at row {i}"));
        }
        if !is_percentage(r.zero_pct) {
            c.push(format!("zero_pct out of range at row {i}: {}", r.zero_pct));
        }
        if !is_percentage(r.context_zero_pct) {
            c.push(format!(
                "context_zero_pct out of range at row {i}: {}",
                r.context_zero_pct
            ));
        }
        if !is_percentage(r.percentage_threshold) {
            c.push(format!(
                "percentage_threshold out of range at row {i}: {}",
                r.percentage_threshold
            ));
        }
        if r.is_out_of_season && !r.is_out_of_season_raw {
            c.push(format!(
                "is_out_of_season without is_out_of_season_raw at row {i}"
            ));
        }
    }

    c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
