use crate::output::read_report;
use crate::utils::config::REPORT_SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != REPORT_SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            REPORT_SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Bootstrap: {}", report.bootstrap);
    for vendor in &report.vendors {
        println!("  Vendor: {} ({} files)", vendor.name, vendor.file_count);
    }
    for section in &report.sections {
        println!(
            "  {}: {} variables, {} chart columns, {} lane-averaged vendors",
            section.title,
            section.variables.len(),
            section.charts.len(),
            section.lane_averages.len()
        );
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("RMT Margin Report Schema");
    println!("Current Version: {}", REPORT_SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string       - ISO 8601 timestamp");
        println!("  bootstrap: bool            - Columns resampled before statistics");
        println!("  margin_line: number?       - Reference margin line for charts");
        println!("  vendors: array             - Vendor runs in input order");
        println!("    name, folder, file_count");
        println!("  sections: array            - One per CPU and margin type");
        println!("    kind: object             - cpu + margin_type");
        println!("    title: string            - e.g. 'CPU0 Rank Margin'");
        println!("    variables: array         - Column names");
        println!("    statistics: array        - Per vendor, per variable summary or error");
        println!("      summary: object?       - mean, median, std_dev, iqr, mean_minus_Nsd");
        println!("    charts: array?           - Per variable, per vendor values/histogram/box_plot");
        println!("    lane_averages: array?    - Per vendor averaged lane series (lane sections)");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("RMT Margin Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("DDR5 Read Margin Test log analysis: statistics and lane averages per vendor.");
}
