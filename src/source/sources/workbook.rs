use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use crate::errors::PipelineError;
use crate::source::TableSource;
use crate::source::row_view::{CellValue, RawRecord, RawTable};
use crate::types::SheetName;

/// Workbook-backed table source (xlsx, xlsm, xls, ods).
///
/// The first row of the selected sheet is the header row.
#[derive(Clone, Debug)]
pub struct WorkbookSource {
    path: PathBuf,
    sheet: Option<SheetName>,
}

impl WorkbookSource {
    /// Read the first sheet of the workbook at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
        }
    }

    /// Select a sheet by name (trimmed, case-insensitive).
    pub fn with_sheet(mut self, sheet: impl Into<SheetName>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    fn select_sheet(&self, names: &[String]) -> Result<String, PipelineError> {
        match &self.sheet {
            Some(wanted) => {
                let wanted_key = wanted.trim().to_lowercase();
                names
                    .iter()
                    .find(|name| name.trim().to_lowercase() == wanted_key)
                    .cloned()
                    .ok_or_else(|| PipelineError::SheetMissing {
                        path: self.path.clone(),
                        sheet: wanted.clone(),
                        available: names.join(", "),
                    })
            }
            None => names
                .first()
                .cloned()
                .ok_or_else(|| PipelineError::SheetMissing {
                    path: self.path.clone(),
                    sheet: "<first sheet>".to_string(),
                    available: String::new(),
                }),
        }
    }
}

impl TableSource for WorkbookSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<RawTable, PipelineError> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let sheet = self.select_sheet(&workbook.sheet_names())?;
        let range = workbook.worksheet_range(&sheet)?;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .map(|header_row| {
                header_row
                    .iter()
                    .map(|cell| cell_to_value(cell).display_text().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        let records: Vec<RawRecord> = rows
            .map(|row| RawRecord::new(row.iter().map(cell_to_value).collect()))
            .collect();

        debug!(
            "[re_milestones:source] read sheet '{}' from {} (columns={}, rows={})",
            sheet,
            self.path.display(),
            headers.len(),
            records.len()
        );
        Ok(RawTable::new(headers, records))
    }
}

/// Map a workbook cell onto the pipeline's cell model.
///
/// Error cells (`#N/A`, `#DIV/0!`) read as empty.
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|datetime| CellValue::Date(datetime.date()))
            .unwrap_or(CellValue::Number(value.as_f64())),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
    }
}
