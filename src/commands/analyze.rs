//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Validates the vendor folders and resolves vendor names
//! 2. Ingests every log of every vendor
//! 3. Checks the cross-vendor assumptions
//! 4. Computes statistics, chart data and lane averages
//! 5. Appends the raw CSV rows, writes the JSON report and prints the
//!    requested tables
//!
//! Nothing is written until steps 1-4 have succeeded.

use super::models::AnalyzeArgs;
use crate::output::{
    render_comparator_table, render_variable_table, render_vendor_table, write_report,
    CsvRowSink,
};
use crate::parser::ingest::{check_vendor_runs, derive_vendor_name, ingest_vendor, validate_input_folder};
use crate::parser::VendorRun;
use crate::report::{build_report, MarginReport, ReportOptions};
use crate::utils::config::MAX_INPUT_FOLDERS;
use anyhow::{Context, Result};
use log::{debug, info};
use std::collections::BTreeSet;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// The report that was written
///
/// # Errors
/// * Missing or empty vendor folders
/// * Log files missing a marker or holding malformed rows
/// * Vendors with different file counts or variable lists
/// * Lane series that break the averaging assumptions
/// * File write errors
///
/// # Example
/// ```ignore
/// let args = AnalyzeArgs {
///     folders: vec![PathBuf::from("DDR5_RMT_Hynix_a_b")],
///     ..Default::default()
/// };
///
/// execute_analyze(args)?;
/// ```
pub fn execute_analyze(args: AnalyzeArgs) -> Result<MarginReport> {
    let start_time = Instant::now();

    info!("Starting analysis of {} vendor folders", args.folders.len());

    // Step 1: Validate folders and resolve vendor names
    info!("Step 1/5: Validating input folders...");
    let vendors = resolve_vendors(&args)?;

    // Step 2: Ingest every vendor
    info!("Step 2/5: Ingesting vendor logs...");
    let mut runs: Vec<VendorRun> = Vec::with_capacity(vendors.len());
    for (folder, vendor) in args.folders.iter().zip(&vendors) {
        let run = ingest_vendor(folder, vendor, None)
            .with_context(|| format!("Failed to ingest {} from {}", vendor, folder.display()))?;
        debug!("{}: {} files ingested", vendor, run.file_count());
        runs.push(run);
    }

    // Step 3: Cross-vendor checks
    info!("Step 3/5: Checking vendor consistency...");
    check_vendor_runs(&runs).context("Vendor runs cannot be compared")?;

    // Step 4: Statistics and aggregation
    info!("Step 4/5: Computing statistics...");
    let options = ReportOptions::from(&args.config);
    let report = build_report(&runs, &options).context("Failed to build report")?;

    // Step 5: Outputs
    info!("Step 5/5: Writing outputs...");
    if args.config.write_raw_csv {
        let mut sink = CsvRowSink::new(&args.csv_dir);
        for run in &runs {
            run.write_rows(&mut sink)
                .with_context(|| format!("Failed to append raw rows for {}", run.vendor))?;
        }
        info!("Raw rows appended under: {}", sink.dir().display());
    }

    write_report(&report, &args.output_json).context("Failed to write report JSON")?;
    info!("✓ Report written to: {}", args.output_json.display());

    print_tables(&report, &args);

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Vendor names in folder order, derived unless given explicitly
///
/// **Private** - internal helper for execute_analyze
fn resolve_vendors(args: &AnalyzeArgs) -> Result<Vec<String>> {
    for folder in &args.folders {
        validate_input_folder(folder)?;
    }

    let vendors = if args.vendors.is_empty() {
        args.folders
            .iter()
            .map(|folder| derive_vendor_name(folder))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        args.vendors.clone()
    };

    let unique: BTreeSet<&str> = vendors.iter().map(String::as_str).collect();
    if unique.len() != vendors.len() {
        anyhow::bail!("Vendor names must be unique, got {:?}", vendors);
    }

    for (folder, vendor) in args.folders.iter().zip(&vendors) {
        info!("  {} <- {}", vendor, folder.display());
    }

    Ok(vendors)
}

/// **Private** - prints whatever the toggles and `--summary` ask for
fn print_tables(report: &MarginReport, args: &AnalyzeArgs) {
    let outputs = &args.config.outputs;

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("RMT SUMMARY");
        println!("{}", "=".repeat(80));
        for vendor in &report.vendors {
            println!("{:<12} {:>4} files  {}", vendor.name, vendor.file_count, vendor.folder);
        }
        for section in &report.sections {
            let failed = section
                .statistics
                .iter()
                .flat_map(|s| &s.variables)
                .filter(|v| v.summary.is_none())
                .count();
            println!(
                "{:<20} {:>3} variables  {:>3} failed statistics",
                section.title,
                section.variables.len(),
                failed
            );
        }
        println!("{}", "=".repeat(80));
    }

    if outputs.vendor_table {
        println!("\n{}", render_vendor_table(report));
    }
    if outputs.variable_table {
        println!("\n{}", render_variable_table(report));
    }
    if outputs.comparator {
        println!("\n{}", render_comparator_table(report));
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.folders.is_empty() {
        anyhow::bail!("At least one vendor folder is required");
    }

    if args.folders.len() > MAX_INPUT_FOLDERS {
        anyhow::bail!(
            "Too many vendor folders: {} (max {})",
            args.folders.len(),
            MAX_INPUT_FOLDERS
        );
    }

    if !args.vendors.is_empty() && args.vendors.len() != args.folders.len() {
        anyhow::bail!(
            "Got {} vendor names for {} folders",
            args.vendors.len(),
            args.folders.len()
        );
    }

    if args.vendors.iter().any(|v| v.trim().is_empty()) {
        anyhow::bail!("Vendor names cannot be empty");
    }

    if args.config.lane_capacity == 0 {
        anyhow::bail!("lane_capacity must be greater than 0");
    }

    if let Some(expected) = args.config.expected_lanes {
        if expected == 0 || expected > args.config.lane_capacity {
            anyhow::bail!(
                "expected_lanes must be between 1 and lane_capacity ({})",
                args.config.lane_capacity
            );
        }
    }

    if !args.config.margin_line.is_finite() {
        anyhow::bail!("margin_line must be a finite number");
    }

    Ok(())
}
