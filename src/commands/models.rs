use crate::utils::config::{RunConfig, DEFAULT_CSV_DIR};
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// One folder per vendor run
    pub folders: Vec<PathBuf>,

    /// Explicit vendor names (empty = derive from folder names)
    pub vendors: Vec<String>,

    /// Run configuration after CLI overrides
    pub config: RunConfig,

    /// Directory for the raw row CSV files
    pub csv_dir: PathBuf,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Print the vendor statistics summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            vendors: Vec::new(),
            config: RunConfig::default(),
            csv_dir: PathBuf::from(DEFAULT_CSV_DIR),
            output_json: PathBuf::from("rmt_report.json"),
            print_summary: false,
        }
    }
}
