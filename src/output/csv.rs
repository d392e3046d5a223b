//! Append-only raw row CSV files.
//!
//! One file per (vendor, margin kind), named `{vendor}_{kind}.csv`. The
//! header is an empty cell followed by the variable names; every later run
//! appends its rows below the existing ones without repeating the header.

use crate::parser::ingest::RowSink;
use crate::parser::schema::{MarginKind, MarginRow, VariableList};
use crate::utils::error::OutputError;
use log::debug;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// `RowSink` writing raw rows under a directory
#[derive(Debug, Clone)]
pub struct CsvRowSink {
    dir: PathBuf,
}

impl CsvRowSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `vendor`'s rows of `kind`
    pub fn path_for(&self, vendor: &str, kind: MarginKind) -> PathBuf {
        self.dir.join(format!("{}_{}.csv", vendor, kind.key()))
    }
}

impl RowSink for CsvRowSink {
    fn append(
        &mut self,
        vendor: &str,
        kind: MarginKind,
        variables: &VariableList,
        rows: &[MarginRow],
    ) -> Result<(), OutputError> {
        let path = self.path_for(vendor, kind);
        append_rows(&path, variables, rows)
    }
}

/// Append rows to a raw CSV file, writing the header if the file is new
///
/// **Public** - also usable without a sink
///
/// # Errors
/// * `OutputError::InvalidPath` - Parent directory cannot be created
/// * `OutputError::WriteFailed` - File cannot be opened
/// * `OutputError::Csv` - Record write failed
pub fn append_rows(
    path: &Path,
    variables: &VariableList,
    rows: &[MarginRow],
) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating CSV directory: {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);

    if needs_header {
        let header = std::iter::once("").chain(variables.iter());
        writer.write_record(header)?;
    }

    for row in rows {
        writer.write_record(row.to_record())?;
    }
    writer.flush()?;

    debug!("Appended {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Read back a raw CSV file: the variable header and every row
///
/// # Errors
/// * `OutputError::Csv` - File missing or malformed
pub fn read_raw_rows(path: impl AsRef<Path>) -> Result<(VariableList, Vec<MarginRow>), OutputError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path.as_ref())?;

    let variables = VariableList::new(reader.headers()?.iter().skip(1).map(str::to_string).collect());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let tokens = record.iter().map(str::to_string).collect();
        if let Some(row) = MarginRow::from_tokens(tokens) {
            rows.push(row);
        }
    }

    Ok((variables, rows))
}
