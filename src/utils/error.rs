//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating and reading input folders and files
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Input path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Input folder contains no log files: {}", .0.display())]
    EmptyFolder(PathBuf),

    #[error("Cannot derive a vendor name from folder '{0}' (expected at least 3 '_'-separated segments)")]
    InvalidFolderName(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while segmenting and tokenizing a margin dump
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("CPU{cpu}: marker '{marker}' not found")]
    MissingMarker { cpu: u8, marker: String },

    #[error("CPU{cpu} {table}: row {line} has {found} tokens, expected {expected}")]
    MalformedRow {
        cpu: u8,
        table: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Lane label '{label}' does not match <series>.<prefix><lane><suffix>: {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("Lane label '{label}' has lane index {lane}, capacity is {capacity}")]
    LaneOutOfRange {
        label: String,
        lane: usize,
        capacity: usize,
    },
}

/// Parse failure tied to the vendor and file it came from
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("{vendor}: {file}: {source}")]
    Parse {
        vendor: String,
        file: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Assumption(#[from] AssumptionViolation),

    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Errors that can occur while computing summary statistics
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatisticsError {
    #[error("Not enough observations: got {got}, need at least {min}")]
    NotEnoughObservations { got: usize, min: usize },

    #[error("Row '{label}': token '{token}' is not numeric")]
    NonNumeric { label: String, token: String },

    #[error("Row '{label}' has no column {column}")]
    MissingColumn { label: String, column: usize },
}

/// Preconditions the averaging relies on that the input failed to meet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssumptionViolation {
    #[error("Vendors have different file counts: {}", format_counts(.counts))]
    FileCountMismatch { counts: Vec<(String, usize)> },

    #[error("{context}: variable list {found:?} differs from {expected:?}")]
    VariableListMismatch {
        context: String,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Series '{series}' has {found} lanes, expected {expected}")]
    LaneCountMismatch {
        series: String,
        expected: usize,
        found: usize,
    },

    #[error("Series '{series}' lane {lane} was seen {seen} times over {files} files")]
    LaneCoverage {
        series: String,
        lane: usize,
        seen: usize,
        files: usize,
    },

    #[error("Variable count changed from {expected} to {found} between files")]
    ColumnCountMismatch { expected: usize, found: usize },
}

fn format_counts(counts: &[(String, usize)]) -> String {
    counts
        .iter()
        .map(|(vendor, n)| format!("{}={}", vendor, n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur while averaging lane margins across files
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    #[error(transparent)]
    Assumption(#[from] AssumptionViolation),
}

/// Aggregation failure tied to the vendor and section it came from
#[derive(Error, Debug)]
#[error("{vendor}: {section}: {source}")]
pub struct ReportError {
    pub vendor: String,
    pub section: String,
    #[source]
    pub source: AggregationError,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading a run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
