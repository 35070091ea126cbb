//! Cell value normalization. Every function here is total: malformed input
//! yields `None` for that field, never an error.

use chrono::NaiveDate;

use crate::source::CellValue;
use crate::source::date_helpers::{excel_serial_to_date, parse_flexible_date};
use crate::utils::normalize_inline_whitespace;

/// Literal placeholder strings upstream exports write for missing values.
const ABSENT_LITERALS: &[&str] = &["nan", "None"];

/// Clean a text cell.
///
/// Trims, collapses whitespace runs, and maps empty text plus the literals
/// `nan`/`None` (case-sensitive) to `None`. Non-text cells are stringified
/// first, so a numeric name column still yields text.
pub fn normalize_text(cell: &CellValue) -> Option<String> {
    let raw = cell.display_text()?;
    normalize_text_str(&raw)
}

/// [`normalize_text`] over an already extracted string.
pub fn normalize_text_str(raw: &str) -> Option<String> {
    let cleaned = normalize_inline_whitespace(raw);
    if cleaned.is_empty() || ABSENT_LITERALS.contains(&cleaned.as_str()) {
        None
    } else {
        Some(cleaned)
    }
}

/// Parse a capacity cell into megawatts.
///
/// Numbers pass through. Text keeps only ASCII digits and `.` before
/// parsing, so `1,234.5 MW` reads as `1234.5`. Text with nothing left after
/// stripping, ambiguous decimals (`1.2.3`), negative or non-finite numbers,
/// and boolean/date cells are all absent. Absent never becomes `0.0`.
pub fn parse_capacity(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Number(value) => *value,
        CellValue::Text(text) => {
            let digits: String = text
                .chars()
                .filter(|ch| ch.is_ascii_digit() || *ch == '.')
                .collect();
            if digits.is_empty() {
                return None;
            }
            digits.parse::<f64>().ok()?
        }
        CellValue::Empty | CellValue::Bool(_) | CellValue::Date(_) => return None,
    };
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Best-effort date parse.
///
/// Native date cells pass through, numbers are read as Excel serials, and
/// text goes through the flexible parser.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(date) => Some(*date),
        CellValue::Number(serial) => excel_serial_to_date(*serial),
        CellValue::Text(text) => parse_flexible_date(text),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Parse a row ordinal. Only whole numbers are accepted.
pub fn parse_serial(cell: &CellValue) -> Option<i64> {
    let value = match cell {
        CellValue::Number(value) => *value,
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if let Ok(value) = trimmed.parse::<i64>() {
                return Some(value);
            }
            trimmed.parse::<f64>().ok()?
        }
        CellValue::Empty | CellValue::Bool(_) | CellValue::Date(_) => return None,
    };
    (value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64)
        .then_some(value as i64)
}
