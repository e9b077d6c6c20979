//! The per-region detection step run inside the worker pool.

use oos_detect::{DetectConfig, DetectError, OosDay, RawObservation, detect_region};

/// Classifies one region's series.
///
/// Implementations run concurrently on the worker pool and must not share
/// mutable state between calls.
pub trait RegionDetector: Sync {
    /// Runs detection for one region.
    fn detect(
        &self,
        raw: &[RawObservation],
        config: &DetectConfig,
    ) -> Result<Vec<OosDay>, DetectError>;
}

/// The standard detector, [`detect_region`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OosDetector;

impl RegionDetector for OosDetector {
    fn detect(
        &self,
        raw: &[RawObservation],
        config: &DetectConfig,
    ) -> Result<Vec<OosDay>, DetectError> {
        detect_region(raw, config)
    }
}
