//! Report JSON schema.
//!
//! This module defines the structure of the report files we write to disk
//! and hand to chart/workbook renderers. Schema is versioned to allow
//! future evolution.

use crate::aggregator::LaneAverages;
use crate::parser::schema::{MarginKind, VariableList};
use crate::stats::{BoxPlotStats, Histogram, StatSummary};
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Whether columns were bootstrap-resampled before statistics
    pub bootstrap: bool,

    /// Reference margin line for charts (absent when disabled)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin_line: Option<f64>,

    /// Vendors in input order
    pub vendors: Vec<VendorInfo>,

    /// One section per CPU and margin type
    pub sections: Vec<MarginSection>,
}

impl MarginReport {
    pub fn section(&self, kind: MarginKind) -> Option<&MarginSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

/// A vendor run that contributed to the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorInfo {
    pub name: String,
    pub folder: String,
    pub file_count: usize,
}

/// Data products of one margin kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginSection {
    pub kind: MarginKind,

    /// e.g. "CPU0 Rank Margin"
    pub title: String,

    pub variables: VariableList,

    /// Summary statistics per vendor, in vendor order
    pub statistics: Vec<VendorStatistics>,

    /// Chart columns per variable (only when a chart output is enabled)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub charts: Vec<VariableChart>,

    /// Per-lane averages per vendor (lane margin sections only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lane_averages: Vec<VendorLaneAverages>,
}

impl MarginSection {
    pub fn vendor_statistics(&self, vendor: &str) -> Option<&VendorStatistics> {
        self.statistics.iter().find(|s| s.vendor == vendor)
    }
}

/// Statistics of every variable for one vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorStatistics {
    pub vendor: String,
    pub variables: Vec<VariableStatistics>,
}

impl VendorStatistics {
    pub fn variable(&self, name: &str) -> Option<&VariableStatistics> {
        self.variables.iter().find(|v| v.variable == name)
    }
}

/// Summary of one (vendor, variable), or why it could not be computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableStatistics {
    pub variable: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<StatSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Chart data of one variable, one entry per vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableChart {
    pub variable: String,
    pub vendors: Vec<VendorColumn>,
}

/// Analysed column of one vendor for one variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorColumn {
    pub vendor: String,

    /// Values in row order (bit margin scatter)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_plot: Option<BoxPlotStats>,
}

/// Lane averages of one vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorLaneAverages {
    pub vendor: String,
    pub averages: LaneAverages,
}
