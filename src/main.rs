//! RMT Margin Studio CLI
//!
//! Analyses DDR5 Read Margin Test logs from up to three vendor runs.
//! Produces summary statistics, chart data and per-lane averages.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use rmt_margin_studio::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};
use rmt_margin_studio::utils::config::{load_run_config, RunConfig, DEFAULT_CSV_DIR};

/// RMT Margin Studio - DDR5 Read Margin Test analysis
#[derive(Parser, Debug)]
#[command(name = "rmt-analyze")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyse one to three vendor run folders
    Analyze {
        /// Vendor run folder (repeat for each vendor)
        #[arg(short, long = "folder", required = true)]
        folders: Vec<PathBuf>,

        /// Vendor name per folder, in the same order (default: derived from folder name)
        #[arg(long = "vendor")]
        vendors: Vec<String>,

        /// TOML run configuration; flags below override it
        #[arg(short, long, env = "RMT_CONFIG")]
        config: Option<PathBuf>,

        /// Bootstrap-resample every column before statistics
        #[arg(long)]
        bootstrap: bool,

        /// Draw the reference margin line on charts
        #[arg(long)]
        include_margin_line: bool,

        /// Position of the reference margin line
        #[arg(long)]
        margin_line: Option<f64>,

        /// Emit histogram data
        #[arg(long)]
        histogram: bool,

        /// Print the per-vendor statistics table
        #[arg(long)]
        vendor_table: bool,

        /// Emit box-plot data
        #[arg(long)]
        box_plot: bool,

        /// Print the per-variable comparison table
        #[arg(long)]
        variable_table: bool,

        /// Emit bit margin scatter data
        #[arg(long)]
        bit_margin: bool,

        /// Average lane margins across files and compare vendors
        #[arg(long)]
        comparator: bool,

        /// Exact lane count of every lane series
        #[arg(long, conflicts_with = "any_lane_count")]
        expected_lanes: Option<usize>,

        /// Accept lane series of any length
        #[arg(long)]
        any_lane_count: bool,

        /// Directory for the raw row CSV files
        #[arg(long)]
        csv_dir: Option<PathBuf>,

        /// Do not append raw rows to CSV files
        #[arg(long)]
        no_csv: bool,

        /// Output path for the JSON report
        #[arg(short, long, default_value = "rmt_report.json")]
        output: PathBuf,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            folders,
            vendors,
            config,
            bootstrap,
            include_margin_line,
            margin_line,
            histogram,
            vendor_table,
            box_plot,
            variable_table,
            bit_margin,
            comparator,
            expected_lanes,
            any_lane_count,
            csv_dir,
            no_csv,
            output,
            summary,
        } => {
            let mut run_config = match &config {
                Some(path) => load_run_config(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => RunConfig::default(),
            };

            // Flags only switch things on; the file supplies the rest
            run_config.bootstrap |= bootstrap;
            run_config.include_margin_line |= include_margin_line || margin_line.is_some();
            if let Some(line) = margin_line {
                run_config.margin_line = line;
            }

            let outputs = &mut run_config.outputs;
            outputs.histogram |= histogram;
            outputs.vendor_table |= vendor_table;
            outputs.box_plot |= box_plot;
            outputs.variable_table |= variable_table;
            outputs.bit_margin |= bit_margin;
            outputs.comparator |= comparator;

            if any_lane_count {
                run_config.expected_lanes = None;
            } else if expected_lanes.is_some() {
                run_config.expected_lanes = expected_lanes;
            }
            if no_csv {
                run_config.write_raw_csv = false;
            }

            let args = AnalyzeArgs {
                folders,
                vendors,
                config: run_config,
                csv_dir: csv_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_DIR)),
                output_json: output,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
