//! Selection across every (adm level, length) pair of a grid search.

use oos_io::{AdmLevel, ResultLayout};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::analysis::analyze_grid_results;
use crate::config::SelectConfig;
use crate::error::SelectError;
use crate::report::BicReport;
use crate::summary::Recommendation;

/// An (adm level, length) pair that produced no recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedAnalysis {
    pub adm_level: u8,
    pub length: u32,
    /// Display text of the error that caused the skip.
    pub reason: String,
}

/// Recommendations of every analysable pair plus the pairs that were skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComprehensiveAnalysis {
    /// Sorted by median BIC.
    pub recommendations: Vec<Recommendation>,
    pub skipped: Vec<SkippedAnalysis>,
    /// Full report of every recommended pair, in analysis order.
    #[serde(skip)]
    pub reports: Vec<BicReport>,
}

impl ComprehensiveAnalysis {
    /// Pretty JSON of the recommendations and skipped pairs.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Serialize`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, SelectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Analyses every (adm level, length) pair of `layout`.
///
/// Pairs without results or without any finite BIC are logged and recorded
/// as [`SkippedAnalysis`]; they do not stop the remaining pairs.
///
/// # Errors
///
/// Returns [`SelectError::InvalidConfig`] for an invalid `config` and
/// [`SelectError::Io`] if an existing result file cannot be decoded.
pub fn run_comprehensive_analysis(
    layout: &ResultLayout,
    adm_levels: &[AdmLevel],
    lengths: &[u32],
    config: &SelectConfig,
) -> Result<ComprehensiveAnalysis, SelectError> {
    config.validate()?;
    let mut out = ComprehensiveAnalysis {
        recommendations: Vec::new(),
        skipped: Vec::new(),
        reports: Vec::new(),
    };

    for &adm_level in adm_levels {
        for &length in lengths {
            let _span = info_span!("select", %adm_level, length).entered();
            let report = analyze_grid_results(layout, adm_level, length, config).and_then(
                |records| BicReport::build(&records, adm_level, length, config.top_regions()),
            );
            match report {
                Ok(report) => {
                    info!(
                        combination = %report.recommendation.params(),
                        median_bic = report.recommendation.median_bic,
                        "recommendation"
                    );
                    out.recommendations.push(report.recommendation.clone());
                    out.reports.push(report);
                }
                Err(e @ (SelectError::MissingResults { .. }
                | SelectError::NoValidCombination { .. })) => {
                    warn!(error = %e, "analysis skipped");
                    out.skipped.push(SkippedAnalysis {
                        adm_level: adm_level.get(),
                        length,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    out.recommendations
        .sort_by(|a, b| a.median_bic.total_cmp(&b.median_bic));
    info!(
        analysed = out.recommendations.len(),
        skipped = out.skipped.len(),
        "comprehensive analysis complete"
    );
    Ok(out)
}
