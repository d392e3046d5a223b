//! Output writers for margin reports and raw rows.
//!
//! This module handles writing data to disk and stdout:
//! - Append-only raw row CSV files
//! - JSON reports (pretty)
//! - Text tables

pub mod csv;
pub mod json;
pub mod table;

// Re-export main functions
pub use self::csv::{append_rows, read_raw_rows, CsvRowSink};
pub use json::{read_report, report_to_string, write_report};
pub use table::{render_comparator_table, render_variable_table, render_vendor_table};
