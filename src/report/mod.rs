//! Report assembly.
//!
//! Combines ingested vendor runs into the versioned report consumed by
//! chart and workbook renderers.

pub mod builder;
pub mod schema;

pub use builder::{build_report, ReportOptions};
pub use schema::{
    MarginReport, MarginSection, VariableChart, VariableStatistics, VendorColumn, VendorInfo,
    VendorLaneAverages, VendorStatistics,
};
