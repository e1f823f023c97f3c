//! Type definitions for trade journal processing

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single untyped cell value from a decoded export row.
///
/// Journal exports are decoded with dynamic typing: cells that look numeric
/// arrive as [`RawValue::Number`], blank cells as [`RawValue::Empty`], and
/// everything else as [`RawValue::Text`]. The field resolver decides what a
/// cell means; this type never does.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Textual cell content, whitespace preserved
    Text(String),
    /// Numeric cell content as decoded by the reader
    Number(f64),
    /// Blank cell
    Empty,
}

impl RawValue {
    /// Interpret the cell as a finite number, if possible
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Empty => return None,
        };
        n.is_finite().then_some(n)
    }

    /// Render the cell as text (numbers without a trailing `.0`)
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            RawValue::Empty => String::new(),
        }
    }

    /// True for blank cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Text(s) => s.trim().is_empty(),
            RawValue::Number(_) => false,
            RawValue::Empty => true,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// One decoded journal row: ordered `(column name, value)` pairs.
///
/// Column order is preserved from the source file. The resolver's
/// first-match and last-match rules depend on that order, so this is a
/// positional list rather than a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    columns: Vec<(String, RawValue)>,
}

impl RawRow {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column in source order
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.columns.push((name.into(), value.into()));
    }

    /// Look up a column by exact name (first occurrence wins)
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Iterate columns in source order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the row has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True when every cell in the row is blank
    pub fn is_blank(&self) -> bool {
        self.columns.iter().all(|(_, value)| value.is_blank())
    }
}

impl FromIterator<(String, RawValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// A canonical trade record derived from one raw row.
///
/// Immutable once constructed. Construction fails (the row is dropped)
/// only when no primary date resolves; every other extraction degrades to
/// a safe default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTrade {
    /// Signed monetary P&L, currency symbols and thousands separators stripped
    pub amount: f64,

    /// Signed price-level delta between open and close.
    /// Sign follows `amount` when both price levels resolved, 0 otherwise.
    pub points: f64,

    /// Authoritative close timestamp used for all calendar bucketing
    pub close_time: NaiveDateTime,

    /// Holding time in whole seconds; 0 when either endpoint was unresolved
    pub duration_seconds: i64,

    /// Canonical ticker (parenthetical and " converted" suffixes stripped)
    pub market: String,

    /// The raw market label exactly as exported
    pub original_market: String,

    /// Calendar year of `close_time`
    pub year: i32,

    /// External trade identifier used for deduplication; may be empty
    pub reference: String,
}

impl NormalizedTrade {
    /// Calendar date of the close
    pub fn close_date(&self) -> chrono::NaiveDate {
        self.close_time.date()
    }

    /// Holding time formatted as `HH:MM:SS`
    pub fn duration_hms(&self) -> String {
        let total = self.duration_seconds.max(0);
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Temporal resolution of a calendar bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
    Year,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
            Granularity::Year => write!(f, "year"),
        }
    }
}

/// One calendar period at one granularity: the key for excursion and
/// drill-down queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Day { year: i32, month: u32, day: u32 },
    Week { year: i32, week: u32 },
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl Period {
    /// Granularity of this period
    pub fn granularity(&self) -> Granularity {
        match self {
            Period::Day { .. } => Granularity::Day,
            Period::Week { .. } => Granularity::Week,
            Period::Month { .. } => Granularity::Month,
            Period::Year { .. } => Granularity::Year,
        }
    }

    /// Whether a trade's close timestamp falls inside this period
    pub fn contains(&self, trade: &NormalizedTrade) -> bool {
        let date = trade.close_date();
        match *self {
            Period::Day { year, month, day } => {
                date.year() == year && date.month() == month && date.day() == day
            }
            Period::Week { year, week } => {
                date.year() == year && crate::aggregate::week_number(date) == week
            }
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Year { year } => date.year() == year,
        }
    }
}

/// Active market selection, passed explicitly into every aggregation and
/// query call. There is no ambient filter state in the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketFilter {
    /// No filtering: every trade participates
    #[default]
    AllMarkets,
    /// Exact match on the canonical ticker
    Market(String),
}

impl MarketFilter {
    /// Whether a trade passes the filter
    pub fn matches(&self, trade: &NormalizedTrade) -> bool {
        match self {
            MarketFilter::AllMarkets => true,
            MarketFilter::Market(market) => trade.market == *market,
        }
    }
}

impl std::fmt::Display for MarketFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketFilter::AllMarkets => write!(f, "All Markets"),
            MarketFilter::Market(market) => write!(f, "{market}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trade_on(date: NaiveDate) -> NormalizedTrade {
        NormalizedTrade {
            amount: 10.0,
            points: 1.0,
            close_time: date.and_hms_opt(12, 0, 0).unwrap(),
            duration_seconds: 90,
            market: "FTSE 100".to_string(),
            original_market: "FTSE 100 (£1)".to_string(),
            year: date.year(),
            reference: "R1".to_string(),
        }
    }

    #[test]
    fn raw_value_as_number() {
        assert_eq!(RawValue::Number(2.5).as_number(), Some(2.5));
        assert_eq!(RawValue::from(" 7050.5 ").as_number(), Some(7050.5));
        assert_eq!(RawValue::from("n/a").as_number(), None);
        assert_eq!(RawValue::Empty.as_number(), None);
        assert_eq!(RawValue::from("NaN").as_number(), None);
    }

    #[test]
    fn raw_value_as_text_renders_integers_plainly() {
        assert_eq!(RawValue::Number(12345.0).as_text(), "12345");
        assert_eq!(RawValue::Number(1.5).as_text(), "1.5");
        assert_eq!(RawValue::Empty.as_text(), "");
    }

    #[test]
    fn raw_row_get_returns_first_occurrence() {
        let mut row = RawRow::new();
        row.push("Reference", "A");
        row.push("Reference", "B");
        assert_eq!(row.get("Reference"), Some(&RawValue::from("A")));
        assert_eq!(row.get("Missing"), None);
    }

    #[test]
    fn raw_row_blank_detection() {
        let mut row = RawRow::new();
        row.push("A", RawValue::Empty);
        row.push("B", "   ");
        assert!(row.is_blank());
        row.push("C", 1.0);
        assert!(!row.is_blank());
    }

    #[test]
    fn duration_formats_as_hms() {
        let mut trade = trade_on(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        trade.duration_seconds = 3661;
        assert_eq!(trade.duration_hms(), "01:01:01");
        trade.duration_seconds = 0;
        assert_eq!(trade.duration_hms(), "00:00:00");
    }

    #[test]
    fn period_contains_checks_calendar_fields() {
        let trade = trade_on(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert!(Period::Day {
            year: 2025,
            month: 3,
            day: 4
        }
        .contains(&trade));
        assert!(!Period::Day {
            year: 2025,
            month: 3,
            day: 5
        }
        .contains(&trade));
        assert!(Period::Month {
            year: 2025,
            month: 3
        }
        .contains(&trade));
        assert!(Period::Year { year: 2025 }.contains(&trade));
        assert!(!Period::Year { year: 2024 }.contains(&trade));
    }

    #[test]
    fn market_filter_matches() {
        let trade = trade_on(NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert!(MarketFilter::AllMarkets.matches(&trade));
        assert!(MarketFilter::Market("FTSE 100".to_string()).matches(&trade));
        assert!(!MarketFilter::Market("Gold".to_string()).matches(&trade));
    }
}
