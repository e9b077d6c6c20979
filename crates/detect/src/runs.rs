//! Maximal runs of `true` values and circular run-length filtering.

/// Finds maximal runs of consecutive `true` values.
///
/// Each run is returned as an inclusive `(start, end)` index pair, in order.
pub fn find_runs(flags: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, &flag) in flags.iter().enumerate() {
        match (flag, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, flags.len() - 1));
    }
    runs
}

fn run_len((start, end): (usize, usize)) -> usize {
    end - start + 1
}

/// Removes runs of `true` shorter than `min_len`, treating the sequence as
/// circular.
///
/// When the first run starts at index 0 and a different last run ends at the
/// final index, the two are one run across the sequence boundary: both are
/// kept if their combined length is at least `min_len` and both are cleared
/// otherwise. Every other run is judged on its own length.
///
/// Applying the filter to its own output returns the output unchanged.
///
/// ```
/// use oos_detect::filter_short_runs;
///
/// let flags = [true, true, false, true, false, true];
/// // The wrapped run (indices 5, 0, 1) has length 3; the middle run has 1.
/// let kept = filter_short_runs(&flags, 3);
/// assert_eq!(kept, vec![true, true, false, false, false, true]);
/// ```
pub fn filter_short_runs(flags: &[bool], min_len: usize) -> Vec<bool> {
    let mut result = vec![false; flags.len()];
    let runs = find_runs(flags);
    if runs.is_empty() {
        return result;
    }

    let last_idx = flags.len() - 1;
    let first = runs[0];
    let last = runs[runs.len() - 1];
    let wraps = runs.len() >= 2 && first.0 == 0 && last.1 == last_idx;

    let mut keep: Vec<(usize, usize)> = Vec::with_capacity(runs.len());
    let middle: &[(usize, usize)] = if wraps {
        if run_len(first) + run_len(last) >= min_len {
            keep.push(first);
            keep.push(last);
        }
        &runs[1..runs.len() - 1]
    } else {
        &runs
    };
    keep.extend(middle.iter().copied().filter(|&r| run_len(r) >= min_len));

    for (start, end) in keep {
        result[start..=end].fill(true);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(len: usize, ranges: &[(usize, usize)]) -> Vec<bool> {
        let mut v = vec![false; len];
        for &(s, e) in ranges {
            v[s..=e].fill(true);
        }
        v
    }

    #[test]
    fn find_runs_basic() {
        let v = flags(10, &[(1, 2), (5, 5), (7, 9)]);
        assert_eq!(find_runs(&v), vec![(1, 2), (5, 5), (7, 9)]);
    }

    #[test]
    fn find_runs_empty_and_all_false() {
        assert!(find_runs(&[]).is_empty());
        assert!(find_runs(&[false, false]).is_empty());
    }

    #[test]
    fn find_runs_all_true() {
        assert_eq!(find_runs(&[true; 4]), vec![(0, 3)]);
    }

    #[test]
    fn empty_input() {
        assert!(filter_short_runs(&[], 5).is_empty());
    }

    #[test]
    fn short_runs_removed_long_kept() {
        let v = flags(20, &[(2, 3), (6, 12)]);
        assert_eq!(filter_short_runs(&v, 5), flags(20, &[(6, 12)]));
    }

    #[test]
    fn run_exactly_min_len_is_kept() {
        let v = flags(10, &[(2, 6)]);
        assert_eq!(filter_short_runs(&v, 5), v);
    }

    #[test]
    fn wraparound_merge_kept() {
        let v = flags(365, &[(0, 5), (360, 364)]);
        assert_eq!(filter_short_runs(&v, 10), v);
    }

    #[test]
    fn wraparound_merge_dropped() {
        let v = flags(365, &[(0, 5), (360, 364)]);
        assert_eq!(filter_short_runs(&v, 15), vec![false; 365]);
    }

    #[test]
    fn middle_runs_filtered_independently_when_wrapping() {
        let v = flags(100, &[(0, 9), (20, 22), (40, 69), (95, 99)]);
        assert_eq!(
            filter_short_runs(&v, 10),
            flags(100, &[(0, 9), (40, 69), (95, 99)])
        );
        assert_eq!(filter_short_runs(&v, 20), flags(100, &[(40, 69)]));
    }

    #[test]
    fn single_run_touching_both_ends_is_one_run() {
        let v = vec![true; 8];
        assert_eq!(filter_short_runs(&v, 8), v);
        assert_eq!(filter_short_runs(&v, 9), vec![false; 8]);
    }

    #[test]
    fn run_touching_only_start_is_not_merged() {
        let v = flags(20, &[(0, 3), (10, 12)]);
        assert_eq!(filter_short_runs(&v, 4), flags(20, &[(0, 3)]));
    }

    #[test]
    fn idempotent() {
        let patterns = [
            flags(50, &[(0, 2), (5, 20), (30, 31), (47, 49)]),
            flags(50, &[(0, 7), (10, 11), (45, 49)]),
            flags(50, &[(3, 9), (20, 40)]),
            vec![true; 50],
        ];
        for v in &patterns {
            for min_len in [1, 3, 6, 10, 60] {
                let once = filter_short_runs(v, min_len);
                let twice = filter_short_runs(&once, min_len);
                assert_eq!(once, twice, "min_len {min_len}");
            }
        }
    }

    #[test]
    fn filtered_implies_raw() {
        let v = flags(40, &[(0, 1), (4, 15), (20, 21), (38, 39)]);
        let out = filter_short_runs(&v, 4);
        for (raw, kept) in v.iter().zip(&out) {
            assert!(!kept || *raw);
        }
    }
}
