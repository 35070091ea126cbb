use chrono::NaiveDate;

use crate::types::HeaderName;
use crate::utils::clean_header;

/// One spreadsheet cell before normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CellValue {
    #[default]
    /// Missing or blank cell.
    Empty,
    /// Text as stored.
    Text(String),
    /// Numeric cell, including integers.
    Number(f64),
    /// Boolean cell.
    Bool(bool),
    /// Date-typed cell.
    Date(NaiveDate),
}

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Stringified cell value, the way an upstream export would print it.
    ///
    /// Integral numbers print without a fractional part (`12`, not `12.0`).
    pub fn display_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Number(value) => Some(format_number(*value)),
            CellValue::Bool(value) => Some(if *value { "True" } else { "False" }.to_string()),
            CellValue::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
        }
    }
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// One raw source row; cells are positional and line up with `RawTable::headers`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRecord {
    cells: Vec<CellValue>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl RawRecord {
    /// Record from positional cells.
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Cell at `idx`; short rows read as empty.
    pub fn get(&self, idx: usize) -> &CellValue {
        self.cells.get(idx).unwrap_or(&EMPTY_CELL)
    }

    /// Cell for an optionally resolved column.
    pub fn get_opt(&self, idx: Option<usize>) -> &CellValue {
        idx.map(|idx| self.get(idx)).unwrap_or(&EMPTY_CELL)
    }

    /// True when every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}

/// Header row plus data rows read from one sheet or delimited file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<HeaderName>,
    rows: Vec<RawRecord>,
}

impl RawTable {
    /// Build a table, cleaning headers and naming blank ones `Unnamed: <idx>`.
    pub fn new<H, I>(headers: I, rows: Vec<RawRecord>) -> Self
    where
        I: IntoIterator<Item = H>,
        H: AsRef<str>,
    {
        let headers = headers
            .into_iter()
            .enumerate()
            .map(|(idx, header)| {
                let cleaned = clean_header(header);
                if cleaned.is_empty() {
                    format!("Unnamed: {idx}")
                } else {
                    cleaned
                }
            })
            .collect();
        Self { headers, rows }
    }

    /// Cleaned headers in column order.
    pub fn headers(&self) -> &[HeaderName] {
        &self.headers
    }

    /// Data rows in source order.
    pub fn rows(&self) -> &[RawRecord] {
        &self.rows
    }

    /// Position of an exact header, as returned by the column resolver.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|candidate| candidate == header)
    }

    /// True when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_cleans_headers_and_names_blank_ones() {
        let table = RawTable::new(["  S. No ", "Capacity\n(MW)", ""], Vec::new());
        assert_eq!(table.headers(), &["S. No", "Capacity (MW)", "Unnamed: 2"]);
        assert_eq!(table.column_index("Capacity (MW)"), Some(1));
        assert_eq!(table.column_index("Capacity"), None);
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let record = RawRecord::new(vec![CellValue::Text("a".to_string())]);
        assert_eq!(record.get(5), &CellValue::Empty);
        assert_eq!(record.get_opt(None), &CellValue::Empty);
        assert_eq!(record.get_opt(Some(0)), &CellValue::Text("a".to_string()));
    }

    #[test]
    fn blank_detection_covers_whitespace_text() {
        let record = RawRecord::new(vec![
            CellValue::Empty,
            CellValue::Text("   ".to_string()),
        ]);
        assert!(record.is_blank());
        let record = RawRecord::new(vec![CellValue::Number(0.0)]);
        assert!(!record.is_blank());
    }

    #[test]
    fn display_text_prints_integral_numbers_plainly() {
        assert_eq!(CellValue::Number(12.0).display_text().as_deref(), Some("12"));
        assert_eq!(CellValue::Number(12.5).display_text().as_deref(), Some("12.5"));
        assert_eq!(
            CellValue::Date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap())
                .display_text()
                .as_deref(),
            Some("2025-06-30")
        );
        assert_eq!(CellValue::Empty.display_text(), None);
    }
}
