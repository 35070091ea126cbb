//! Raw table sources.
//!
//! Ownership model:
//! - `TableSource` reads one sheet (or one delimited file) into a `RawTable`.
//! - `RawTable` owns cleaned headers plus positional `RawRecord` rows; it is
//!   dropped once the normalizer has produced canonical records.
//! - `open_table_source` picks the reader from the file extension.

use std::path::{Path, PathBuf};

use crate::constants::inputs::DELIMITED_EXTENSIONS;
use crate::errors::PipelineError;

/// Date parsing helpers for free-text and serial date cells.
pub mod date_helpers;
/// Cell, row, and table types shared by all readers.
pub mod row_view;
/// Concrete table readers.
pub mod sources;

pub use row_view::{CellValue, RawRecord, RawTable};
pub use sources::delimited::DelimitedSource;
pub use sources::workbook::WorkbookSource;

/// Read-once tabular input.
///
/// Implementations never mutate or lock the underlying file, so the same
/// path can be read repeatedly and from independent processes.
pub trait TableSource: Send + Sync {
    /// Path this source reads.
    fn path(&self) -> &Path;
    /// Read the whole table into memory.
    fn read_table(&self) -> Result<RawTable, PipelineError>;
}

/// Build the reader for `path`: delimited text for `.csv`/`.tsv`/`.txt`,
/// workbook otherwise. `sheet` only applies to workbooks.
pub fn open_table_source(path: &Path, sheet: Option<&str>) -> Box<dyn TableSource> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if DELIMITED_EXTENSIONS.contains(&extension.as_str()) {
        let source = DelimitedSource::new(path);
        return if extension == "tsv" {
            Box::new(source.with_delimiter(b'\t'))
        } else {
            Box::new(source)
        };
    }
    let source = WorkbookSource::new(path);
    match sheet {
        Some(sheet) => Box::new(source.with_sheet(sheet)),
        None => Box::new(source),
    }
}

/// First candidate path that exists on disk.
pub fn first_existing<P: AsRef<Path>>(candidates: &[P]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|candidate| candidate.as_ref())
        .find(|candidate| candidate.is_file())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn first_existing_respects_candidate_order() {
        let temp = tempdir().unwrap();
        let second = temp.path().join("report..xlsx");
        let third = temp.path().join("report.csv");
        std::fs::write(&second, b"x").unwrap();
        std::fs::write(&third, b"x").unwrap();

        let candidates = [temp.path().join("report.xlsx"), second.clone(), third];
        assert_eq!(first_existing(&candidates), Some(second));
        assert_eq!(first_existing::<PathBuf>(&[]), None);
    }

    #[test]
    fn extension_selects_reader() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("Projects.CSV");
        std::fs::write(&path, "Project Name\nAlpha\n").unwrap();
        let table = open_table_source(&path, Some("ignored"))
            .read_table()
            .unwrap();
        assert_eq!(table.headers(), &["Project Name"]);
        assert_eq!(open_table_source(&path, None).path(), path.as_path());
    }
}
