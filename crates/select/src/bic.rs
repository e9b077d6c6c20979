//! Bayesian information criterion of one region's out-of-season runs.

use oos_detect::find_runs;
use oos_stats::sum_sq_dev;
use serde::Serialize;

/// Floor substituted for `SS_W / n` when the runs fit perfectly.
pub const BIC_FLOOR: f64 = 1e-10;

/// BIC and its components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BicScore {
    /// Number of valid runs.
    pub k: usize,
    /// Days across valid runs; `None` when `k = 0`.
    pub n: Option<usize>,
    /// Within-run sum of squared deviations; `None` when `k = 0`.
    pub ss_w: Option<f64>,
    /// BIC, `+inf` for degenerate fits.
    pub bic: f64,
}

impl BicScore {
    /// `true` when there is at least one valid run.
    pub fn has_structure(&self) -> bool {
        self.k > 0
    }
}

/// Scores the `true` runs of `flags` against the smoothed percentages.
///
/// Runs shorter than `min_run_length` are ignored. With `k` valid runs
/// covering `n` days and within-run sum of squares `SS_W`:
///
/// ```text
/// BIC = k ln(n) + n ln(SS_W / n)
/// ```
///
/// `SS_W / n` is replaced by [`BIC_FLOOR`] when `SS_W < BIC_FLOOR`. The score
/// is `+inf` when `k = 0` or `n <= k`.
///
/// Both slices must be ordered by month-day and have the same length.
///
/// ```
/// use oos_select::calculate_bic;
///
/// let pct = [10.0, 99.0, 100.0, 98.0, 12.0];
/// let flags = [false, true, true, true, false];
/// let score = calculate_bic(&pct, &flags, 3);
/// assert_eq!(score.k, 1);
/// assert_eq!(score.n, Some(3));
/// assert!(score.bic.is_finite());
/// ```
pub fn calculate_bic(context_zero_pct: &[f64], flags: &[bool], min_run_length: usize) -> BicScore {
    let valid: Vec<(usize, usize)> = find_runs(flags)
        .into_iter()
        .filter(|&(start, end)| end - start + 1 >= min_run_length)
        .collect();

    let k = valid.len();
    if k == 0 {
        return BicScore {
            k,
            n: None,
            ss_w: None,
            bic: f64::INFINITY,
        };
    }

    let n: usize = valid.iter().map(|&(start, end)| end - start + 1).sum();
    let ss_w: f64 = valid
        .iter()
        .map(|&(start, end)| sum_sq_dev(&context_zero_pct[start..=end]))
        .sum();

    let bic = if n > k {
        let (kf, nf) = (k as f64, n as f64);
        let fit = if ss_w < BIC_FLOOR { BIC_FLOOR } else { ss_w / nf };
        kf * nf.ln() + nf * fit.ln()
    } else {
        f64::INFINITY
    };

    BicScore {
        k,
        n: Some(n),
        ss_w: Some(ss_w),
        bic,
    }
}
