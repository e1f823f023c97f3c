//! Trade normalization: raw rows into canonical trade records

use crate::resolve;
use crate::types::{NormalizedTrade, RawRow};
use chrono::Datelike;
use tracing::debug;

/// Diagnostics from one normalization pass.
///
/// The engine never surfaces malformed input as an error; callers that
/// want to report data quality read the drop count here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Rows received
    pub rows_in: usize,
    /// Rows rejected for a missing or unparsable primary date
    pub dropped_no_date: usize,
}

/// Canonical ticker from a raw market label.
///
/// Truncates at a parenthetical suffix (" (") first, else at a literal
/// " converted" suffix, else returns the label verbatim.
pub fn canonical_ticker(label: &str) -> String {
    if let Some(idx) = label.find(" (") {
        label[..idx].trim().to_string()
    } else if let Some(idx) = label.find(" converted") {
        label[..idx].trim().to_string()
    } else {
        label.to_string()
    }
}

/// Build a canonical trade from one raw row, stripping the default
/// currency symbols from the amount.
pub fn normalize_row(row: &RawRow) -> Option<NormalizedTrade> {
    normalize_row_with_symbols(row, resolve::DEFAULT_CURRENCY_SYMBOLS)
}

/// Build a canonical trade from one raw row with a configured currency
/// symbol set.
///
/// Returns `None` only when no primary date resolves; every other field
/// degrades to its documented default.
pub fn normalize_row_with_symbols(
    row: &RawRow,
    currency_symbols: &str,
) -> Option<NormalizedTrade> {
    let close_time = resolve::primary_date(row)?;

    let amount = resolve::amount_with_symbols(row, currency_symbols);

    let (open_level, close_level) = resolve::price_levels(row);
    let mut points = 0.0;
    if open_level != 0.0 && close_level != 0.0 {
        points = (close_level - open_level).abs();
        if amount < 0.0 {
            points = -points;
        }
    }

    let duration_seconds = match (resolve::open_time(row), resolve::close_time(row)) {
        (Some(open), Some(close)) => (close - open).num_seconds().abs(),
        _ => 0,
    };

    let original_market = resolve::market_label(row);
    let market = canonical_ticker(&original_market);

    let reference = row
        .get("Reference")
        .map(|value| value.as_text())
        .unwrap_or_default();

    Some(NormalizedTrade {
        amount,
        points,
        close_time,
        duration_seconds,
        market,
        original_market,
        year: close_time.year(),
        reference,
    })
}

/// Normalize a batch of rows with the default currency symbols.
pub fn normalize_rows(rows: &[RawRow]) -> (Vec<NormalizedTrade>, NormalizeReport) {
    normalize_rows_with_symbols(rows, resolve::DEFAULT_CURRENCY_SYMBOLS)
}

/// Normalize a batch of rows, dropping those without a resolvable primary
/// date and reporting how many were dropped.
pub fn normalize_rows_with_symbols(
    rows: &[RawRow],
    currency_symbols: &str,
) -> (Vec<NormalizedTrade>, NormalizeReport) {
    let mut trades = Vec::with_capacity(rows.len());
    let mut report = NormalizeReport {
        rows_in: rows.len(),
        ..Default::default()
    };

    for row in rows {
        match normalize_row_with_symbols(row, currency_symbols) {
            Some(trade) => trades.push(trade),
            None => report.dropped_no_date += 1,
        }
    }

    if report.dropped_no_date > 0 {
        debug!(
            rows_in = report.rows_in,
            dropped = report.dropped_no_date,
            "dropped rows without a resolvable primary date"
        );
    }

    (trades, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawValue;

    fn row(pairs: &[(&str, RawValue)]) -> RawRow {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn canonical_ticker_strips_suffixes() {
        assert_eq!(canonical_ticker("FTSE 100 (£1 Mini)"), "FTSE 100");
        assert_eq!(canonical_ticker("EUR/USD converted at 0.83"), "EUR/USD");
        assert_eq!(canonical_ticker("Gold"), "Gold");
        assert_eq!(canonical_ticker("Unknown"), "Unknown");
    }

    #[test]
    fn parenthetical_takes_precedence_over_converted() {
        assert_eq!(canonical_ticker("Wall St (per 1.0) converted"), "Wall St");
    }

    #[test]
    fn normalize_builds_full_trade() {
        let r = row(&[
            ("Reference", RawValue::from("ABC123")),
            ("MarketName", RawValue::from("FTSE 100 (£1 Mini)")),
            ("PL Amount", RawValue::from("£150.00")),
            ("Open Level", RawValue::Number(7000.0)),
            ("Close Level", RawValue::Number(7050.0)),
            ("OpenDateUtc", RawValue::from("2025-10-02T14:00:00")),
            ("DateUtc", RawValue::from("2025-10-02T14:30:00")),
        ]);
        let trade = normalize_row(&r).unwrap();
        assert_eq!(trade.amount, 150.0);
        assert_eq!(trade.points, 50.0);
        assert_eq!(trade.market, "FTSE 100");
        assert_eq!(trade.original_market, "FTSE 100 (£1 Mini)");
        assert_eq!(trade.duration_seconds, 1800);
        assert_eq!(trade.year, 2025);
        assert_eq!(trade.reference, "ABC123");
    }

    #[test]
    fn points_sign_follows_amount() {
        let r = row(&[
            ("PL Amount", RawValue::from("-£25.00")),
            ("Open Level", RawValue::Number(100.0)),
            ("Close Level", RawValue::Number(95.0)),
            ("DateUtc", RawValue::from("2025-10-02T14:30:00")),
        ]);
        let trade = normalize_row(&r).unwrap();
        assert_eq!(trade.amount, -25.0);
        assert_eq!(trade.points, -5.0);
    }

    #[test]
    fn points_zero_when_either_level_missing() {
        let r = row(&[
            ("PL Amount", RawValue::from("£10.00")),
            ("Open Level", RawValue::Number(100.0)),
            ("DateUtc", RawValue::from("2025-10-02T14:30:00")),
        ]);
        let trade = normalize_row(&r).unwrap();
        assert_eq!(trade.points, 0.0);
    }

    #[test]
    fn duration_zero_when_open_time_unresolved() {
        let r = row(&[
            ("PL Amount", RawValue::from("£10.00")),
            ("DateUtc", RawValue::from("2025-10-02T14:30:00")),
        ]);
        let trade = normalize_row(&r).unwrap();
        assert_eq!(trade.duration_seconds, 0);
    }

    #[test]
    fn row_without_primary_date_is_dropped() {
        let rows = vec![
            row(&[
                ("PL Amount", RawValue::from("£10.00")),
                ("DateUtc", RawValue::from("2025-10-02T14:30:00")),
            ]),
            row(&[("PL Amount", RawValue::from("£99.00"))]),
            row(&[
                ("PL Amount", RawValue::from("£5.00")),
                ("DateUtc", RawValue::from("unparsable")),
            ]),
        ];
        let (trades, report) = normalize_rows(&rows);
        assert_eq!(trades.len(), 1);
        assert_eq!(report.rows_in, 3);
        assert_eq!(report.dropped_no_date, 2);
    }

    #[test]
    fn configured_symbols_reach_amount_resolution() {
        let r = row(&[
            ("PL Amount", RawValue::from("¥2,500")),
            ("DateUtc", RawValue::from("2025-10-02T14:30:00")),
        ]);
        let trade = normalize_row_with_symbols(&r, "¥").unwrap();
        assert_eq!(trade.amount, 2500.0);
        // The default set leaves the yen sign in place; parsing fails to 0.
        assert_eq!(normalize_row(&r).unwrap().amount, 0.0);
    }

    #[test]
    fn missing_market_becomes_unknown() {
        let r = row(&[("DateUtc", RawValue::from("2025-10-02T14:30:00"))]);
        let trade = normalize_row(&r).unwrap();
        assert_eq!(trade.market, "Unknown");
        assert_eq!(trade.original_market, "Unknown");
    }

    #[test]
    fn numeric_reference_renders_as_integer_text() {
        let r = row(&[
            ("Reference", RawValue::Number(48210.0)),
            ("DateUtc", RawValue::from("2025-10-02T14:30:00")),
        ]);
        let trade = normalize_row(&r).unwrap();
        assert_eq!(trade.reference, "48210");
    }
}
