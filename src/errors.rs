use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::SheetName;

/// Error type for spreadsheet reading, schema lookup, and export failures.
///
/// Pipeline runs never surface these directly; they are folded into
/// `PipelineNotice` values at the ingestion boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No file at the given path.
    #[error("input file '{}' does not exist", path.display())]
    InputMissing {
        /// Path that was looked up.
        path: PathBuf,
    },
    /// The workbook has no sheet with the configured name.
    #[error("workbook '{}' has no sheet named '{sheet}' (found: {available})", path.display())]
    SheetMissing {
        /// Workbook path.
        path: PathBuf,
        /// Configured sheet name.
        sheet: SheetName,
        /// Comma-separated sheet names that do exist.
        available: String,
    },
    /// No header matched any candidate for a required field.
    #[error("table '{}' has no '{field}' column", path.display())]
    ColumnMissing {
        /// Table path.
        path: PathBuf,
        /// Canonical field name.
        field: &'static str,
    },
    /// Workbook could not be opened or decoded.
    #[error("workbook read failure: {0}")]
    Workbook(#[from] calamine::Error),
    /// Delimited file could not be read or written.
    #[error("delimited read/write failure: {0}")]
    Csv(#[from] csv::Error),
    /// JSON encoding failed.
    #[error("json encode failure: {0}")]
    Json(#[from] serde_json::Error),
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}
