//! Statistical helper functions for the out-of-season pipeline.

use std::cmp::Ordering;

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sum of squared deviations from the mean, `Σ(x - mean)²`.
/// Returns 0.0 if empty.
pub fn sum_sq_dev(data: &[f64]) -> f64 {
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum()
}

/// Sample variance with N-1 denominator (matching pandas' `std()`).
/// Returns NaN if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return f64::NAN;
    }
    sum_sq_dev(data) / (n as f64 - 1.0)
}

/// Sample standard deviation with N-1 denominator.
/// Returns NaN if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Median of pre-sorted data. For even length, averages the middle two values.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn median(sorted: &[f64]) -> f64 {
    assert!(!sorted.is_empty(), "median: input must not be empty");
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Returns a sorted copy of `data` in ascending order.
///
/// `+inf` sorts after every finite value and NaN sorts last.
pub fn sorted(data: &[f64]) -> Vec<f64> {
    let mut out = data.to_vec();
    out.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(b),
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn test_sum_sq_dev() {
        // mean 5, deviations -2,-1,0,1,2 -> 10
        assert_relative_eq!(sum_sq_dev(&[3.0, 4.0, 5.0, 6.0, 7.0]), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sum_sq_dev_constant() {
        assert_eq!(sum_sq_dev(&[100.0, 100.0, 100.0]), 0.0);
    }

    #[test]
    fn test_sd() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(sd(&data), 2.138090, epsilon = 1e-6);
    }

    #[test]
    fn test_sd_single_is_nan() {
        assert!(sd(&[5.0]).is_nan());
    }

    #[test]
    fn test_variance_two() {
        // [3.0, 7.0]: mean=5, sum_sq=8, var=8/1=8
        assert_relative_eq!(variance(&[3.0, 7.0]), 8.0, epsilon = 1e-10);
    }

    #[test]
    fn test_median_odd() {
        assert_relative_eq!(median(&[1.0, 2.0, 3.0]), 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_median_even() {
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_median_with_infinity_in_upper_half() {
        let s = sorted(&[f64::INFINITY, 1.0, 2.0]);
        assert_eq!(median(&s), 2.0);
    }

    #[test]
    fn test_sorted_places_nan_last() {
        let s = sorted(&[3.0, f64::NAN, f64::INFINITY, -1.0]);
        assert_eq!(s[0], -1.0);
        assert_eq!(s[1], 3.0);
        assert_eq!(s[2], f64::INFINITY);
        assert!(s[3].is_nan());
    }

    #[test]
    #[should_panic(expected = "median: input must not be empty")]
    fn test_median_empty_panics() {
        median(&[]);
    }
}
