//! Configuration and constants for the margin pipeline.
//!
//! Marker literals describe the layout of a vendor RMT dump. `RunConfig`
//! carries the per-run toggles and can be loaded from a TOML file; CLI flags
//! are layered on top of it by the analyze command.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

// Log markers. CPU-scoped markers get the CPU number appended ("START_RMT_N0").
pub const START_MARKER_PREFIX: &str = "START_RMT_N";
pub const STOP_MARKER_PREFIX: &str = "STOP_RMT_N";
pub const RANK_MARGIN_MARKER: &str = "Rank Margin";
pub const LANE_MARGIN_MARKER: &str = "Lane Margin";
pub const CA_LANE_MARGIN_MARKER: &str = "CA Lane Margin";
pub const VARIABLE_HEADER_MARKER: &str = "RxDqs-";
pub const IO_LEVEL_MARKER: &str = "IoLevel";

/// Bootstrap draws exactly this many samples with replacement
pub const BOOTSTRAP_SAMPLES: usize = 1000;

/// Fixed resampling seed; changing it changes every bootstrapped report
pub const BOOTSTRAP_SEED: u64 = 1;

/// Highest lane count a single lane-margin series may hold
pub const DEFAULT_LANE_CAPACITY: usize = 40;

/// Reference margin drawn on charts when the margin line is enabled
pub const DEFAULT_MARGIN_LINE: f64 = 6.0;

pub const ROUND_DECIMALS: i32 = 4;

/// Widest unit-width histogram emitted; wider columns get no histogram
pub const MAX_HISTOGRAM_BINS: usize = 10_000;

/// The front-end accepts between one and this many vendor folders
pub const MAX_INPUT_FOLDERS: usize = 3;

/// Default directory for the append-only raw row CSV files
pub const DEFAULT_CSV_DIR: &str = "rmt_csv";

/// Which data products a run should hand to the report
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputToggles {
    pub histogram: bool,
    pub vendor_table: bool,
    pub box_plot: bool,
    pub variable_table: bool,
    pub bit_margin: bool,
    pub comparator: bool,
}

impl OutputToggles {
    /// Any chart needs the per-variable columns in the report
    pub fn wants_charts(&self) -> bool {
        self.histogram || self.box_plot || self.bit_margin
    }
}

/// Complete run configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Draw the reference margin line on charts
    pub include_margin_line: bool,

    /// Resample every column before computing statistics
    pub bootstrap: bool,

    /// Position of the reference margin line
    pub margin_line: f64,

    /// Data products to emit
    pub outputs: OutputToggles,

    /// Lane indices at or above this value are rejected
    pub lane_capacity: usize,

    /// Exact lane count every lane-margin series must expose (None = any)
    pub expected_lanes: Option<usize>,

    /// Append parsed rows to the raw CSV files
    pub write_raw_csv: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            include_margin_line: false,
            bootstrap: false,
            margin_line: DEFAULT_MARGIN_LINE,
            outputs: OutputToggles::default(),
            lane_capacity: DEFAULT_LANE_CAPACITY,
            expected_lanes: Some(DEFAULT_LANE_CAPACITY),
            write_raw_csv: true,
        }
    }
}

impl RunConfig {
    /// Margin line position, if it should be drawn
    pub fn margin_line(&self) -> Option<f64> {
        self.include_margin_line.then_some(self.margin_line)
    }
}

/// Load a run configuration from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
///
/// # Example
/// ```ignore
/// let config = load_run_config("rmt.toml")?;
/// ```
pub fn load_run_config(path: impl AsRef<Path>) -> Result<RunConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: RunConfig = toml::from_str(&contents)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert!(!config.bootstrap);
        assert_eq!(config.lane_capacity, 40);
        assert_eq!(config.expected_lanes, Some(40));
        assert_eq!(config.margin_line(), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RunConfig = toml::from_str(
            r#"
            bootstrap = true
            include_margin_line = true

            [outputs]
            comparator = true
            "#,
        )
        .unwrap();

        assert!(config.bootstrap);
        assert_eq!(config.margin_line(), Some(6.0));
        assert!(config.outputs.comparator);
        assert!(!config.outputs.histogram);
        assert_eq!(config.lane_capacity, DEFAULT_LANE_CAPACITY);
    }

    #[test]
    fn test_load_run_config_missing_file() {
        assert!(load_run_config("/definitely/not/here.toml").is_err());
    }
}
