//! Summary statistics for one (vendor, variable) column.
//!
//! Every reported figure is rounded to four decimals. The deviation bands
//! are derived from the rounded mean and standard deviation.

use super::bootstrap::{resample, BootstrapConfig};
use super::percentiles::{iqr_sorted, median_sorted, sorted};
use crate::utils::config::ROUND_DECIMALS;
use crate::utils::error::StatisticsError;
use serde::{Deserialize, Serialize};

/// Central tendency and dispersion of a margin column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    /// Observations the figures were computed from (after resampling)
    pub sample_count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    /// 75th minus 25th percentile
    pub iqr: f64,
    pub mean_minus_1sd: f64,
    pub mean_minus_2sd: f64,
    pub mean_minus_3sd: f64,
}

impl StatSummary {
    /// Deviation band `mean - k * sd` for k in 1..=3
    pub fn band(&self, k: u8) -> Option<f64> {
        match k {
            1 => Some(self.mean_minus_1sd),
            2 => Some(self.mean_minus_2sd),
            3 => Some(self.mean_minus_3sd),
            _ => None,
        }
    }

    /// Rows of the vendor table, in display order
    pub fn table_rows(&self) -> [(&'static str, f64); 7] {
        [
            ("Mean", self.mean),
            ("Median", self.median),
            ("SD", self.std_dev),
            ("IQR", self.iqr),
            ("Mean-1SD", self.mean_minus_1sd),
            ("Mean-2SD", self.mean_minus_2sd),
            ("Mean-3SD", self.mean_minus_3sd),
        ]
    }
}

/// Round to `decimals` places, ties to even on the exact decimal value
///
/// Formatting works on the exact binary value, so `1.03125` (an exact tie)
/// rounds to `1.0312` while `2.675` (stored just below the tie) rounds down.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let places = usize::try_from(decimals).unwrap_or(0);
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

fn round4(value: f64) -> f64 {
    round_to(value, ROUND_DECIMALS)
}

/// Column the statistics and charts are computed from
///
/// With a bootstrap configuration the column is resampled, otherwise it is
/// returned unchanged.
pub fn prepare_column(
    column: &[f64],
    bootstrap: Option<&BootstrapConfig>,
) -> Result<Vec<f64>, StatisticsError> {
    match bootstrap {
        Some(config) => resample(column, config),
        None => Ok(column.to_vec()),
    }
}

/// Compute the summary of a prepared column
///
/// **Public** - main entry point for statistics
///
/// # Errors
/// * `StatisticsError::NotEnoughObservations` - Fewer than two values
///   (standard deviation is undefined)
pub fn compute_stat_summary(column: &[f64]) -> Result<StatSummary, StatisticsError> {
    let n = column.len();
    if n < 2 {
        return Err(StatisticsError::NotEnoughObservations { got: n, min: 2 });
    }

    let mean = column.iter().sum::<f64>() / n as f64;
    let variance = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let std_dev = variance.sqrt();

    let sorted = sorted(column);
    // n >= 2 so both are defined
    let median = median_sorted(&sorted).unwrap_or(mean);
    let iqr = iqr_sorted(&sorted).unwrap_or(0.0);

    let mean = round4(mean);
    let std_dev = round4(std_dev);

    Ok(StatSummary {
        sample_count: n,
        mean,
        median: round4(median),
        std_dev,
        iqr: round4(iqr),
        mean_minus_1sd: round4(mean - std_dev),
        mean_minus_2sd: round4(mean - 2.0 * std_dev),
        mean_minus_3sd: round4(mean - 3.0 * std_dev),
    })
}

/// Resample (optionally) and summarize a column in one step
pub fn summarize_column(
    column: &[f64],
    bootstrap: Option<&BootstrapConfig>,
) -> Result<StatSummary, StatisticsError> {
    compute_stat_summary(&prepare_column(column, bootstrap)?)
}
