/// Delimited-text (CSV) table reader.
pub mod delimited;
/// Workbook (xlsx/xls/ods) table reader.
pub mod workbook;
