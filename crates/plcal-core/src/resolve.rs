//! Field resolution over loosely structured export rows
//!
//! Journal exports name the same logical field differently depending on the
//! platform and export path ("Open Level", "OpenPrice", "open", ...). Each
//! resolver here is an ordered list of candidate matchers: a predicate over
//! the lowercased column name plus a value parser, applied in priority
//! order. Every resolver degrades to a safe default instead of failing;
//! only a missing primary date causes the row to be rejected downstream.

use crate::types::{RawRow, RawValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Currency symbols stripped from monetary cells when no configured set
/// is supplied
pub const DEFAULT_CURRENCY_SYMBOLS: &str = "£$€";

/// Specific open-timestamp field names, in preference order
const OPEN_TIME_FIELDS: &[&str] = &["OpenDateUtc", "OpenTimeUtc"];

/// Specific close-timestamp field names, in preference order
const CLOSE_TIME_FIELDS: &[&str] = &["DateUtc", "CloseDateUtc", "CloseTimeUtc"];

/// Numeric timestamps at or above this magnitude are epoch milliseconds;
/// below it they are epoch seconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 100_000_000_000.0;

/// Datetime layouts tried for textual timestamps, after RFC 3339
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts tried for textual timestamps
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y"];

/// Monetary P&L amount from the literal "PL Amount" column, stripping the
/// default currency symbols.
pub fn amount(row: &RawRow) -> f64 {
    amount_with_symbols(row, DEFAULT_CURRENCY_SYMBOLS)
}

/// Monetary P&L amount with a configured currency symbol set.
///
/// The given symbols and thousands separators (",") are stripped before
/// parsing. Defaults to 0 when the column is absent or unparsable.
pub fn amount_with_symbols(row: &RawRow, currency_symbols: &str) -> f64 {
    match row.get("PL Amount") {
        Some(RawValue::Number(n)) if n.is_finite() => *n,
        Some(RawValue::Text(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != ',' && !currency_symbols.contains(*c))
                .collect();
            cleaned.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn is_open_level_column(lower: &str) -> bool {
    (lower.contains("open") && lower.contains("level"))
        || (lower.contains("open") && lower.contains("price"))
        || lower == "open"
        || lower == "openlevel"
}

fn is_close_level_column(lower: &str) -> bool {
    (lower.contains("close") && lower.contains("level"))
        || (lower.contains("close") && lower.contains("price"))
        || lower == "close"
        || lower == "closelevel"
}

/// Open and close price levels, scanned case-insensitively across every
/// column. The last matching column holding a parseable non-zero value
/// overwrites earlier candidates; unresolved levels stay 0.
pub fn price_levels(row: &RawRow) -> (f64, f64) {
    let mut open = 0.0;
    let mut close = 0.0;

    for (name, value) in row.iter() {
        let lower = name.to_lowercase();
        if is_open_level_column(&lower) {
            if let Some(level) = value.as_number().filter(|n| *n != 0.0) {
                open = level;
            }
        }
        if is_close_level_column(&lower) {
            if let Some(level) = value.as_number().filter(|n| *n != 0.0) {
                close = level;
            }
        }
    }

    (open, close)
}

/// Parse a cell into a timestamp.
///
/// Numbers are epoch values, disambiguated seconds-vs-milliseconds by
/// magnitude. Text is tried against RFC 3339, then the known datetime and
/// date-only layouts in order.
pub fn parse_timestamp(value: &RawValue) -> Option<NaiveDateTime> {
    match value {
        RawValue::Number(n) => parse_epoch(*n),
        RawValue::Text(s) => parse_timestamp_text(s.trim()),
        RawValue::Empty => None,
    }
}

fn parse_epoch(n: f64) -> Option<NaiveDateTime> {
    if !n.is_finite() || n <= 0.0 {
        return None;
    }
    let ts = if n >= EPOCH_MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(n as i64)
    } else {
        DateTime::from_timestamp(n as i64, 0)
    };
    ts.map(|dt| dt.naive_utc())
}

fn parse_timestamp_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Best-effort open timestamp, used only for duration calculation
pub fn open_time(row: &RawRow) -> Option<NaiveDateTime> {
    resolve_time(row, OPEN_TIME_FIELDS, "open")
}

/// Best-effort close timestamp, used only for duration calculation
pub fn close_time(row: &RawRow) -> Option<NaiveDateTime> {
    resolve_time(row, CLOSE_TIME_FIELDS, "close")
}

/// Specific field names first, in order, taking the first that parses.
/// Otherwise scan every column case-insensitively for the keyword combined
/// with "time", "date", or "utc", taking the first parseable match.
fn resolve_time(row: &RawRow, fields: &[&str], keyword: &str) -> Option<NaiveDateTime> {
    for field in fields {
        if let Some(ts) = row.get(field).and_then(parse_timestamp) {
            return Some(ts);
        }
    }

    for (name, value) in row.iter() {
        let lower = name.to_lowercase();
        if lower.contains(keyword)
            && (lower.contains("time") || lower.contains("date") || lower.contains("utc"))
        {
            if let Some(ts) = parse_timestamp(value) {
                return Some(ts);
            }
        }
    }

    None
}

/// Authoritative record date used for calendar bucketing.
///
/// A present, non-empty `DateUtc` is authoritative: if its value fails to
/// parse the row is rejected even when `TextDate` would parse. `TextDate`
/// is only consulted when `DateUtc` is absent or blank.
pub fn primary_date(row: &RawRow) -> Option<NaiveDateTime> {
    if let Some(value) = row.get("DateUtc") {
        if !value.is_blank() {
            return parse_timestamp(value);
        }
    }
    row.get("TextDate").and_then(parse_timestamp)
}

/// Raw market label, or "Unknown" when absent or blank
pub fn market_label(row: &RawRow) -> String {
    match row.get("MarketName") {
        Some(value) if !value.is_blank() => value.as_text(),
        _ => "Unknown".to_string(),
    }
}
