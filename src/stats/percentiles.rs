//! Percentile computation.

use std::cmp::Ordering;

/// Sort a copy of the samples ascending
pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Percentile of already sorted samples
///
/// Uses linear interpolation between the two nearest ranks at
/// `p / 100 * (n - 1)`, the same convention as numpy's default.
/// Returns `None` for an empty slice.
///
/// # Examples
///
/// ```ignore
/// let p25 = percentile_sorted(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 25.0);
/// assert_eq!(p25, Some(4.0));
/// ```
pub fn percentile_sorted(sorted: &[f64], percentile: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let rank = (percentile / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    Some(sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx]))
}

/// Percentile of unsorted samples
pub fn percentile(samples: &[f64], percentile: f64) -> Option<f64> {
    percentile_sorted(&sorted(samples), percentile)
}

/// Median of sorted samples (mean of the middle pair for even counts)
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Interquartile range (75th minus 25th percentile) of sorted samples
pub fn iqr_sorted(sorted: &[f64]) -> Option<f64> {
    Some(percentile_sorted(sorted, 75.0)? - percentile_sorted(sorted, 25.0)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quartiles_interpolate() {
        let samples = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(percentile(&samples, 25.0), Some(4.0));
        assert_eq!(percentile(&samples, 75.0), Some(5.5));
        assert_eq!(iqr_sorted(&samples), Some(1.5));
    }

    #[test]
    fn test_percentile_unsorted_input() {
        let samples = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&samples, 50.0), Some(3.0));
        assert_eq!(percentile(&samples, 0.0), Some(1.0));
        assert_eq!(percentile(&samples, 100.0), Some(5.0));
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median_sorted(&[]), None);
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(percentile(&[42.0], 75.0), Some(42.0));
        assert_eq!(percentile(&[], 50.0), None);
    }
}
