//! RMT Margin Studio
//!
//! Parsing, statistics and lane aggregation for DDR5 Read Margin Test
//! (RMT) logs.
//!
//! This crate provides the core implementation for the
//! `rmt-analyze` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should use the CLI:
//!
//! ```bash
//! rmt-analyze analyze --folder DDR5_RMT_Hynix_2023_07 --vendor-table
//! rmt-analyze --help
//! ```
//!
//! The pipeline is also usable as a library: `parser::ingest_vendor` per
//! vendor folder, `parser::check_vendor_runs`, then `report::build_report`.

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod stats;
pub mod utils;
