//! Integration tests for the engine's documented invariants
//!
//! Exercises the full pipeline (raw rows → normalization → deduplication →
//! aggregation → excursion) against the behaviors the engine guarantees:
//! sign alignment of points, duplicate collapse, bucket totals, excursion
//! clamping, week numbering, and dateless-row rejection.

use plcal::{MarketFilter, Period, RawRow, RawValue, TradeJournal};

fn row(pairs: &[(&str, RawValue)]) -> RawRow {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

fn trade_row(reference: &str, amount: &str, datetime: &str) -> RawRow {
    row(&[
        ("Reference", RawValue::from(reference)),
        ("MarketName", RawValue::from("FTSE 100 (£1 Mini)")),
        ("PL Amount", RawValue::from(amount)),
        ("DateUtc", RawValue::from(datetime)),
    ])
}

#[test]
fn points_sign_matches_amount_sign() {
    let winning = row(&[
        ("Reference", RawValue::from("W")),
        ("PL Amount", RawValue::from("£80.00")),
        ("Open Level", RawValue::Number(7000.0)),
        ("Close Level", RawValue::Number(7040.0)),
        ("DateUtc", RawValue::from("2025-10-02T10:00:00")),
    ]);
    let losing = row(&[
        ("Reference", RawValue::from("L")),
        ("PL Amount", RawValue::from("-£80.00")),
        ("Open Level", RawValue::Number(7000.0)),
        ("Close Level", RawValue::Number(7040.0)),
        ("DateUtc", RawValue::from("2025-10-02T11:00:00")),
    ]);

    let journal = TradeJournal::from_raw_rows(&[winning, losing]);
    for trade in journal.trades() {
        if trade.points != 0.0 {
            assert_eq!(
                trade.amount.signum(),
                trade.points.signum(),
                "points sign must follow amount sign"
            );
        }
    }
}

#[test]
fn settled_amount_wins_over_zero_placeholder() {
    let rows = vec![
        trade_row("DUP-1", "£0.00", "2025-10-02T10:00:00"),
        trade_row("DUP-1", "-£150.00", "2025-10-02T10:05:00"),
    ];
    let journal = TradeJournal::from_raw_rows(&rows);
    assert_eq!(journal.trades().len(), 1);
    assert_eq!(journal.trades()[0].amount, -150.0);
}

#[test]
fn empty_references_never_collapse() {
    let rows = vec![
        trade_row("", "£10.00", "2025-10-02T10:00:00"),
        trade_row("", "£10.00", "2025-10-02T10:00:00"),
    ];
    let journal = TradeJournal::from_raw_rows(&rows);
    assert_eq!(journal.trades().len(), 2);
}

#[test]
fn bucket_totals_equal_member_sums() {
    let rows = vec![
        trade_row("A", "£100.00", "2025-10-02T10:00:00"),
        trade_row("B", "-£30.00", "2025-10-02T14:00:00"),
        trade_row("C", "£50.00", "2025-10-03T09:00:00"),
        trade_row("D", "£25.00", "2025-11-01T09:00:00"),
    ];
    let journal = TradeJournal::from_raw_rows(&rows);
    let filter = MarketFilter::AllMarkets;
    let summaries = journal.summaries(&filter);

    for ((year, month, day), bucket) in &summaries.daily {
        let expected: f64 = journal
            .trades_in_period(
                &filter,
                Period::Day {
                    year: *year,
                    month: *month,
                    day: *day,
                },
            )
            .iter()
            .map(|t| t.amount)
            .sum();
        assert!((bucket.total - expected).abs() < 1e-9);
    }

    for (year, bucket) in &summaries.yearly {
        let expected: f64 = journal
            .trades_in_period(&filter, Period::Year { year: *year })
            .iter()
            .map(|t| t.amount)
            .sum();
        assert!((bucket.total - expected).abs() < 1e-9);
    }
}

#[test]
fn winning_day_excursion_replays_chronologically() {
    // Amounts +100, -30, +50 → cumulative 100, 70, 120
    let rows = vec![
        trade_row("A", "£100.00", "2025-10-02T09:00:00"),
        trade_row("B", "-£30.00", "2025-10-02T11:00:00"),
        trade_row("C", "£50.00", "2025-10-02T15:00:00"),
    ];
    let journal = TradeJournal::from_raw_rows(&rows);
    let ohlc = journal
        .excursion(
            &MarketFilter::AllMarkets,
            Period::Day {
                year: 2025,
                month: 10,
                day: 2,
            },
        )
        .unwrap();
    assert_eq!(ohlc.open, 0.0);
    assert_eq!(ohlc.close, 120.0);
    assert_eq!(ohlc.high, 120.0);
    assert_eq!(ohlc.low, 0.0);
}

#[test]
fn losing_day_excursion_clamps_high_to_baseline() {
    // Amounts -50, -20, +10 → cumulative -50, -70, -60
    let rows = vec![
        trade_row("A", "-£50.00", "2025-10-02T09:00:00"),
        trade_row("B", "-£20.00", "2025-10-02T11:00:00"),
        trade_row("C", "£10.00", "2025-10-02T15:00:00"),
    ];
    let journal = TradeJournal::from_raw_rows(&rows);
    let ohlc = journal
        .excursion(
            &MarketFilter::AllMarkets,
            Period::Day {
                year: 2025,
                month: 10,
                day: 2,
            },
        )
        .unwrap();
    assert_eq!(ohlc.open, 0.0);
    assert_eq!(ohlc.close, -60.0);
    assert_eq!(ohlc.high, 0.0);
    assert_eq!(ohlc.low, -70.0);
}

#[test]
fn january_first_on_saturday_is_week_one() {
    // January 1, 2022 was a Saturday.
    let rows = vec![trade_row("A", "£10.00", "2022-01-01T12:00:00")];
    let journal = TradeJournal::from_raw_rows(&rows);
    let summaries = journal.summaries(&MarketFilter::AllMarkets);
    assert!(summaries.weekly.contains_key(&(2022, 1)));
    assert_eq!(summaries.weekly.get(&(2022, 1)).unwrap().trade_count, 1);
}

#[test]
fn unparsable_date_excludes_row_everywhere() {
    let rows = vec![
        trade_row("A", "£10.00", "2025-10-02T10:00:00"),
        row(&[
            ("Reference", RawValue::from("B")),
            ("PL Amount", RawValue::from("£99.00")),
            ("DateUtc", RawValue::from("not-a-date")),
        ]),
    ];
    let journal = TradeJournal::from_raw_rows(&rows);
    assert_eq!(journal.trades().len(), 1);
    assert_eq!(journal.report().dropped_no_date, 1);

    let summaries = journal.summaries(&MarketFilter::AllMarkets);
    let total: f64 = summaries.yearly.values().map(|b| b.total).sum();
    assert_eq!(total, 10.0);
}

#[test]
fn market_filter_rebuild_is_whole_pass() {
    let mut gold = trade_row("G", "£40.00", "2025-10-02T10:00:00");
    gold = {
        let mut r = RawRow::new();
        for (name, value) in gold.iter() {
            if name == "MarketName" {
                r.push(name, RawValue::from("Gold"));
            } else {
                r.push(name, value.clone());
            }
        }
        r
    };
    let rows = vec![trade_row("F", "£100.00", "2025-10-02T09:00:00"), gold];
    let journal = TradeJournal::from_raw_rows(&rows);

    let all = journal.summaries(&MarketFilter::AllMarkets);
    assert_eq!(all.daily.get(&(2025, 10, 2)).unwrap().trade_count, 2);

    let filtered = journal.summaries(&MarketFilter::Market("Gold".to_string()));
    assert_eq!(filtered.daily.get(&(2025, 10, 2)).unwrap().trade_count, 1);
    assert_eq!(filtered.daily.get(&(2025, 10, 2)).unwrap().total, 40.0);

    // Switching back rebuilds the unfiltered view identically.
    let again = journal.summaries(&MarketFilter::AllMarkets);
    assert_eq!(all, again);
}
