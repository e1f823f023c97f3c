//! Temporal aggregation into calendar buckets

use crate::types::{MarketFilter, NormalizedTrade};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Accumulator for one calendar period at one granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Sum of trade amounts in the period
    pub total: f64,
    /// Number of member trades
    pub trade_count: u32,
}

impl Bucket {
    fn add(&mut self, amount: f64) {
        self.total += amount;
        self.trade_count += 1;
    }
}

/// Whole-pass aggregation output: four ordered bucket maps, one per
/// granularity. Rebuilt from scratch on every pass; never patched
/// incrementally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarSummaries {
    /// Keyed by `(year, month, day)`
    pub daily: BTreeMap<(i32, u32, u32), Bucket>,
    /// Keyed by `(year, week number)`
    pub weekly: BTreeMap<(i32, u32), Bucket>,
    /// Keyed by `(year, month)`
    pub monthly: BTreeMap<(i32, u32), Bucket>,
    /// Keyed by year
    pub yearly: BTreeMap<i32, Bucket>,
}

impl CalendarSummaries {
    /// True when no trade reached any bucket
    pub fn is_empty(&self) -> bool {
        self.yearly.is_empty()
    }
}

/// Serializes with string bucket keys (`"2025-10-02"`, `"2025-W14"`,
/// `"2025-10"`, `"2025"`): JSON and other self-describing formats reject
/// tuple-keyed maps.
impl Serialize for CalendarSummaries {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let daily: BTreeMap<String, Bucket> = self
            .daily
            .iter()
            .map(|(&(year, month, day), bucket)| {
                (format!("{year:04}-{month:02}-{day:02}"), *bucket)
            })
            .collect();
        let weekly: BTreeMap<String, Bucket> = self
            .weekly
            .iter()
            .map(|(&(year, week), bucket)| (format!("{year:04}-W{week:02}"), *bucket))
            .collect();
        let monthly: BTreeMap<String, Bucket> = self
            .monthly
            .iter()
            .map(|(&(year, month), bucket)| (format!("{year:04}-{month:02}"), *bucket))
            .collect();
        let yearly: BTreeMap<String, Bucket> = self
            .yearly
            .iter()
            .map(|(&year, bucket)| (format!("{year:04}"), *bucket))
            .collect();

        let mut state = serializer.serialize_struct("CalendarSummaries", 4)?;
        state.serialize_field("daily", &daily)?;
        state.serialize_field("weekly", &weekly)?;
        state.serialize_field("monthly", &monthly)?;
        state.serialize_field("yearly", &yearly)?;
        state.end()
    }
}

/// Calendar week number for a date.
///
/// `ceil((day_of_year + jan1_weekday + 1) / 7)` with Sunday-based weekday
/// indexing and `day_of_year` counted from 0 on January 1. Locale-agnostic
/// and 1-based; some years produce a week 53. No ISO-8601 correction is
/// applied.
pub fn week_number(date: NaiveDate) -> u32 {
    let days = date.ordinal0();
    let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .expect("january 1 exists for every year chrono represents");
    let jan1_weekday = jan1.weekday().num_days_from_sunday();
    (days + jan1_weekday + 1).div_ceil(7)
}

/// Build all four bucket maps from the deduplicated trade set, applying
/// the market filter. Every matching trade lands in exactly one bucket
/// per granularity.
pub fn build_summaries(trades: &[NormalizedTrade], filter: &MarketFilter) -> CalendarSummaries {
    let mut summaries = CalendarSummaries::default();
    let mut matched = 0usize;

    for trade in trades.iter().filter(|t| filter.matches(t)) {
        let date = trade.close_date();
        let year = date.year();
        let month = date.month();
        let day = date.day();

        summaries
            .daily
            .entry((year, month, day))
            .or_default()
            .add(trade.amount);
        summaries
            .weekly
            .entry((year, week_number(date)))
            .or_default()
            .add(trade.amount);
        summaries
            .monthly
            .entry((year, month))
            .or_default()
            .add(trade.amount);
        summaries.yearly.entry(year).or_default().add(trade.amount);

        matched += 1;
    }

    debug!(
        trades = trades.len(),
        matched,
        filter = %filter,
        "rebuilt calendar summaries"
    );

    summaries
}
