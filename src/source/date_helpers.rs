use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

/// Calendar formats tried in order. Month-first wins over day-first when a
/// value is valid both ways (`05/06/2025` is May 6).
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d-%b-%y",
    "%b %d, %Y",
    "%b %d %Y",
    "%B %d, %Y",
];

/// Date-time formats whose date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

/// Parsed years outside this range are treated as misparses (`June 2025`
/// must never read as day 20 of year 25).
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<i32> = 1900..=2200;

/// Excel stores day 0 as 1899-12-30 (the 1900 leap-year bug is baked in).
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// Largest serial Excel can display (9999-12-31).
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// Best-effort parse of a free-text date cell.
///
/// Tries a month/year pair such as `June 2025` or `Jun-2025` (anchored to
/// day 1), then calendar formats, date-time formats, and RFC 3339. Returns
/// `None` when nothing matches.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(date) = parse_month_year(trimmed) {
        return Some(date);
    }
    let calendar = DATE_FORMATS
        .iter()
        .filter_map(|format| NaiveDate::parse_from_str(trimmed, format).ok());
    let datetime = DATETIME_FORMATS.iter().filter_map(|format| {
        NaiveDateTime::parse_from_str(trimmed, format)
            .ok()
            .map(|value| value.date())
    });
    let rfc3339 = DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|value| value.date_naive());
    calendar
        .chain(datetime)
        .chain(rfc3339)
        .find(|date| PLAUSIBLE_YEARS.contains(&date.year()))
}

/// Convert an Excel serial day number into a date.
///
/// Fractional parts (time of day) are dropped. Serials outside Excel's
/// displayable range yield `None`.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (year, month, day) = EXCEL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(year, month, day)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Parse `<month> <year>` in either order, anchored to the first of the month.
///
/// Exactly one month token and one four-digit year token are required.
fn parse_month_year(value: &str) -> Option<NaiveDate> {
    let tokens: Vec<String> = value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_ascii_lowercase())
        .collect();
    if tokens.len() != 2 {
        return None;
    }
    let months: Vec<u32> = tokens
        .iter()
        .filter_map(|token| month_token_to_number(token))
        .collect();
    let years: Vec<i32> = tokens
        .iter()
        .filter(|token| token.len() == 4)
        .filter_map(|token| token.parse::<i32>().ok())
        .collect();
    match (months.as_slice(), years.as_slice()) {
        ([month], [year]) => NaiveDate::from_ymd_opt(*year, *month, 1),
        _ => None,
    }
}

/// Convert a lowercase month token to a month number (1-12).
fn month_token_to_number(token: &str) -> Option<u32> {
    match token {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}
