//! Margin log parsing.
//!
//! This module handles:
//! - Segmenting raw logs into per-CPU margin sections
//! - Tokenizing rank and lane margin tables
//! - Parsing lane-margin row labels
//! - Ingesting whole vendor folders

pub mod ingest;
pub mod label;
pub mod margin_table;
pub mod schema;
pub mod segmenter;

// Re-export main types
pub use ingest::{
    check_vendor_runs, derive_vendor_name, ingest_vendor, parse_log_text, RowSet, RowSink,
    VendorRun,
};
pub use label::{parse_lane_label, AggregationKey, LaneLabel};
pub use margin_table::build_cpu_margins;
pub use schema::{Cpu, CpuMargins, MarginKind, MarginRow, MarginTable, MarginType, VariableList};
pub use segmenter::{segment_lines, segment_text, CpuSegments};
