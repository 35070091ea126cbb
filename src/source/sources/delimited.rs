use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::PipelineError;
use crate::source::TableSource;
use crate::source::row_view::{CellValue, RawRecord, RawTable};

/// Delimited-text table source. Every non-empty cell is read as text.
#[derive(Clone, Debug)]
pub struct DelimitedSource {
    path: PathBuf,
    delimiter: u8,
}

impl DelimitedSource {
    /// Comma-separated source at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Override the field delimiter (for example `b'\t'`).
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl TableSource for DelimitedSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<RawTable, PipelineError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;
        let headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();

        let mut records = Vec::new();
        for row in reader.byte_records() {
            let row = row?;
            records.push(RawRecord::new(row.iter().map(decode_cell).collect()));
        }

        debug!(
            "[re_milestones:source] read delimited table {} (columns={}, rows={})",
            self.path.display(),
            headers.len(),
            records.len()
        );
        Ok(RawTable::new(headers, records))
    }
}

/// Legacy-encoded bytes are replaced rather than failing the whole table.
fn decode_cell(cell: &[u8]) -> CellValue {
    if cell.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(String::from_utf8_lossy(cell).into_owned())
    }
}
