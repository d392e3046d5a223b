//! Chart-ready distribution data: unit-width histograms and box-plot figures.

use super::percentiles::{median_sorted, percentile_sorted, sorted};
use crate::utils::config::MAX_HISTOGRAM_BINS;
use log::debug;
use serde::{Deserialize, Serialize};

/// Histogram with unit-width bins
///
/// `edges` has one more entry than `counts`; bin `i` covers
/// `[edges[i], edges[i + 1])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bin values into unit-width bins from `floor(min)` through `floor(max)`
///
/// Returns `None` for an empty column, and when the range is not finite or
/// would need more than `MAX_HISTOGRAM_BINS` bins.
pub fn unit_histogram(values: &[f64]) -> Option<Histogram> {
    let (min, max) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;

    let first = min.floor();
    let span = max.floor() - first;
    if !span.is_finite() || span >= MAX_HISTOGRAM_BINS as f64 {
        debug!("histogram skipped: range {}..={} too wide for unit bins", min, max);
        return None;
    }
    let bins = span as usize + 1;

    let mut counts = vec![0usize; bins];
    for &value in values {
        let idx = ((value.floor() - first) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let edges = (0..=bins).map(|i| first + i as f64).collect();
    Some(Histogram { edges, counts })
}

/// Figures a box plot is drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Lowest observation within 1.5 IQR below Q1
    pub whisker_low: f64,
    /// Highest observation within 1.5 IQR above Q3
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Compute box-plot figures, or `None` for an empty column
pub fn box_plot_stats(values: &[f64]) -> Option<BoxPlotStats> {
    let sorted = sorted(values);
    let q1 = percentile_sorted(&sorted, 25.0)?;
    let q3 = percentile_sorted(&sorted, 75.0)?;
    let median = median_sorted(&sorted)?;

    let reach = 1.5 * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    let inside = || sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
    let whisker_low = inside().next().unwrap_or(q1);
    let whisker_high = inside().last().unwrap_or(q3);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| !(low_fence..=high_fence).contains(v))
        .collect();

    Some(BoxPlotStats {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}
