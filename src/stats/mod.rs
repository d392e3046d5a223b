//! Statistics over margin columns.
//!
//! This module transforms parsed margin rows into:
//! - Absolute-valued numeric columns
//! - Summary statistics (mean, median, SD, IQR, deviation bands)
//! - Optional fixed-seed bootstrap resampling
//! - Histogram and box-plot data for charts

pub mod bootstrap;
pub mod columns;
pub mod distribution;
pub mod percentiles;
pub mod summary;

// Re-export main types and functions
pub use bootstrap::{resample, BootstrapConfig};
pub use columns::{extract_column, parse_margin_value};
pub use distribution::{box_plot_stats, unit_histogram, BoxPlotStats, Histogram};
pub use percentiles::{percentile, percentile_sorted};
pub use summary::{compute_stat_summary, prepare_column, round_to, summarize_column, StatSummary};
