//! Vendor folder ingestion.
//!
//! Reads every log file of a vendor folder one at a time, segments it,
//! builds the four margin tables and accumulates their rows per
//! `MarginKind`. File boundaries are kept so lane rows can later be
//! averaged per file.

use super::margin_table::build_cpu_margins;
use super::schema::{Cpu, CpuMargins, MarginKind, MarginRow, MarginType, VariableList};
use super::segmenter::segment_text;
use crate::utils::config::START_MARKER_PREFIX;
use crate::utils::error::{
    AssumptionViolation, IngestError, InputError, OutputError, ParseError,
};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Destination for raw parsed rows
///
/// Called once per (file, CPU, margin type), either during ingestion or
/// later through `VendorRun::write_rows`.
pub trait RowSink {
    fn append(
        &mut self,
        vendor: &str,
        kind: MarginKind,
        variables: &VariableList,
        rows: &[MarginRow],
    ) -> Result<(), OutputError>;
}

/// Rows of one margin kind across files, with per-file boundaries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    rows: Vec<MarginRow>,
    file_ends: Vec<usize>,
}

impl RowSet {
    /// Append the rows of the next file
    pub fn push_file(&mut self, rows: impl IntoIterator<Item = MarginRow>) {
        self.rows.extend(rows);
        self.file_ends.push(self.rows.len());
    }

    pub fn rows(&self) -> &[MarginRow] {
        &self.rows
    }

    pub fn file_count(&self) -> usize {
        self.file_ends.len()
    }

    /// Rows grouped by the file they came from
    pub fn files(&self) -> impl Iterator<Item = &[MarginRow]> {
        let starts = std::iter::once(0).chain(self.file_ends.iter().copied());
        starts
            .zip(self.file_ends.iter().copied())
            .map(move |(start, end)| &self.rows[start..end])
    }
}

/// Everything parsed from one vendor folder
#[derive(Debug, Clone)]
pub struct VendorRun {
    pub vendor: String,
    pub folder: PathBuf,
    pub files: Vec<String>,
    variables: BTreeMap<Cpu, VariableList>,
    tables: BTreeMap<MarginKind, RowSet>,
}

impl VendorRun {
    pub fn new(vendor: impl Into<String>, folder: impl Into<PathBuf>) -> Self {
        Self {
            vendor: vendor.into(),
            folder: folder.into(),
            files: Vec::new(),
            variables: BTreeMap::new(),
            tables: BTreeMap::new(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn variables(&self, cpu: Cpu) -> Option<&VariableList> {
        self.variables.get(&cpu)
    }

    pub fn row_set(&self, kind: MarginKind) -> Option<&RowSet> {
        self.tables.get(&kind)
    }

    /// All rows of a kind across files (empty if none were parsed)
    pub fn rows(&self, kind: MarginKind) -> &[MarginRow] {
        self.tables.get(&kind).map(RowSet::rows).unwrap_or(&[])
    }

    /// Record the parsed CPU sections of one file
    ///
    /// # Errors
    /// * `AssumptionViolation::VariableListMismatch` - A CPU's variable list
    ///   differs from the one seen in this vendor's first file
    pub fn add_file(
        &mut self,
        file_name: impl Into<String>,
        margins: Vec<CpuMargins>,
    ) -> Result<(), AssumptionViolation> {
        let file_name = file_name.into();

        for cpu_margins in &margins {
            match self.variables.get(&cpu_margins.cpu) {
                Some(expected) if *expected != cpu_margins.variables => {
                    return Err(AssumptionViolation::VariableListMismatch {
                        context: format!("{}: {} {}", self.vendor, file_name, cpu_margins.cpu),
                        expected: expected.names().to_vec(),
                        found: cpu_margins.variables.names().to_vec(),
                    });
                }
                Some(_) => {}
                None => {
                    self.variables
                        .insert(cpu_margins.cpu, cpu_margins.variables.clone());
                }
            }
        }

        for cpu_margins in margins {
            let CpuMargins { rank, lane, .. } = cpu_margins;
            for table in [rank, lane] {
                self.tables.entry(table.kind).or_default().push_file(table.rows);
            }
        }

        self.files.push(file_name);
        Ok(())
    }

    /// Replay the ingested rows into a sink, one call per (file, kind)
    ///
    /// # Errors
    /// * `OutputError` - The sink failed
    pub fn write_rows(&self, sink: &mut dyn RowSink) -> Result<(), OutputError> {
        for kind in MarginKind::ALL {
            let (Some(set), Some(variables)) = (self.row_set(kind), self.variables(kind.cpu)) else {
                continue;
            };
            for rows in set.files() {
                sink.append(&self.vendor, kind, variables, rows)?;
            }
        }
        Ok(())
    }
}

/// Parse the text of one log into its CPU sections
///
/// # Errors
/// * `ParseError::MissingMarker` - A CPU's `START_RMT_N{c}` line is absent, or
///   its section lacks a table marker
/// * `ParseError` - A CPU section has a malformed row
pub fn parse_log_text(text: &str) -> Result<Vec<CpuMargins>, ParseError> {
    let segments = segment_text(text);
    Cpu::ALL
        .iter()
        .map(|&cpu| {
            if !segments.has_start(cpu) {
                return Err(ParseError::MissingMarker {
                    cpu: cpu.index(),
                    marker: format!("{}{}", START_MARKER_PREFIX, cpu.index()),
                });
            }
            build_cpu_margins(segments.get(cpu), cpu)
        })
        .collect()
}

/// Derive the vendor name from a run folder
///
/// The vendor is the third-to-last `_`-separated segment of the folder's
/// base name: `DDR5_RMT_Hynix_2023_07` -> `Hynix`.
pub fn derive_vendor_name(folder: &Path) -> Result<String, InputError> {
    let base = folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let segments: Vec<&str> = base.split('_').collect();
    if segments.len() < 3 {
        return Err(InputError::InvalidFolderName(base));
    }

    let vendor = segments[segments.len() - 3];
    if vendor.is_empty() {
        return Err(InputError::InvalidFolderName(base));
    }
    Ok(vendor.to_string())
}

/// Check that a selected folder exists and is a directory
pub fn validate_input_folder(folder: &Path) -> Result<(), InputError> {
    if !folder.exists() {
        return Err(InputError::FolderNotFound(folder.to_path_buf()));
    }
    if !folder.is_dir() {
        return Err(InputError::NotADirectory(folder.to_path_buf()));
    }
    Ok(())
}

/// Regular files of a folder in name order
pub fn list_log_files(folder: &Path) -> Result<Vec<PathBuf>, InputError> {
    let io_err = |source| InputError::Io {
        path: folder.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(folder).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(InputError::EmptyFolder(folder.to_path_buf()));
    }
    Ok(files)
}

/// Read a whole log file; the handle is closed before returning
///
/// Vendor dumps are not guaranteed to be UTF-8, so invalid bytes are replaced.
pub fn read_log_file(path: &Path) -> Result<String, InputError> {
    let bytes = fs::read(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Ingest every log file of one vendor folder
///
/// **Public** - main entry point for ingestion
///
/// # Arguments
/// * `folder` - Vendor run folder
/// * `vendor` - Vendor name used in diagnostics and sink keys
/// * `sink` - Optional destination for the raw rows of every table
///
/// # Errors
/// * `IngestError::Input` - Folder missing/empty or a file cannot be read
/// * `IngestError::Parse` - A file is missing a marker or has a malformed row
/// * `IngestError::Assumption` - Variable lists differ between files
/// * `IngestError::Output` - The sink failed
pub fn ingest_vendor(
    folder: &Path,
    vendor: &str,
    mut sink: Option<&mut dyn RowSink>,
) -> Result<VendorRun, IngestError> {
    validate_input_folder(folder)?;
    let files = list_log_files(folder)?;

    info!("{}: ingesting {} files from {}", vendor, files.len(), folder.display());

    let mut run = VendorRun::new(vendor, folder);

    for path in files {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let text = read_log_file(&path)?;
        let margins = parse_log_text(&text).map_err(|source| IngestError::Parse {
            vendor: vendor.to_string(),
            file: file_name.clone(),
            source,
        })?;

        debug!(
            "{}: {} parsed ({} CPU sections)",
            vendor,
            file_name,
            margins.len()
        );

        if let Some(sink) = sink.as_deref_mut() {
            for cpu_margins in &margins {
                for margin_type in [MarginType::Rank, MarginType::Lane] {
                    let table = cpu_margins.table(margin_type);
                    sink.append(vendor, table.kind, &cpu_margins.variables, &table.rows)?;
                }
            }
        }

        run.add_file(file_name, margins)?;
    }

    Ok(run)
}

/// Check the cross-vendor preconditions of averaging and comparison
///
/// # Errors
/// * `AssumptionViolation::FileCountMismatch` - Vendors have different file counts
/// * `AssumptionViolation::VariableListMismatch` - A CPU's columns differ between vendors
pub fn check_vendor_runs(runs: &[VendorRun]) -> Result<(), AssumptionViolation> {
    let Some(first) = runs.first() else {
        return Ok(());
    };

    if runs.iter().any(|run| run.file_count() != first.file_count()) {
        return Err(AssumptionViolation::FileCountMismatch {
            counts: runs
                .iter()
                .map(|run| (run.vendor.clone(), run.file_count()))
                .collect(),
        });
    }

    for run in &runs[1..] {
        for cpu in Cpu::ALL {
            if let (Some(expected), Some(found)) = (first.variables(cpu), run.variables(cpu)) {
                if expected != found {
                    return Err(AssumptionViolation::VariableListMismatch {
                        context: format!("{} vs {} {}", first.vendor, run.vendor, cpu),
                        expected: expected.names().to_vec(),
                        found: found.names().to_vec(),
                    });
                }
            }
        }
    }

    Ok(())
}
