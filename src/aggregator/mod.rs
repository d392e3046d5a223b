//! Cross-file aggregation of lane-margin rows.
//!
//! This module transforms a vendor's lane-margin rows into:
//! - Per (tab group, series) averaged lane series
//! - One averaged curve per variable, indexed by lane

pub mod lane_average;

// Re-export main types and functions
pub use lane_average::{
    average_lane_rows, average_row_set, AggregationConfig, AveragedSeries, LaneAverager,
    LaneAverages, VariableSeries,
};
