//! The trade journal: owner of the deduplicated trade set and the query
//! surface a presentation layer talks to.
//!
//! Every aggregation pass is whole-pass, synchronous, and deterministic:
//! repeating a query with the same filter reproduces identical output.
//! Nothing is cached across filter changes.

use crate::aggregate::{build_summaries, CalendarSummaries};
use crate::dedup::deduplicate;
use crate::excursion::{cumulative_excursion, Excursion};
use crate::normalize::{normalize_rows_with_symbols, NormalizeReport};
use crate::resolve::DEFAULT_CURRENCY_SYMBOLS;
use crate::types::{MarketFilter, NormalizedTrade, Period, RawRow};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Per-market roll-up of one day's trades, for drill-down views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDaySummary {
    /// Canonical ticker
    pub market: String,
    /// Sum of amounts for the market on the day
    pub total: f64,
    /// Sum of signed points for the market on the day
    pub points: f64,
    /// Number of trades
    pub count: u32,
}

/// Normalized, deduplicated trade set with calendar query methods.
///
/// Construction runs the full ingestion pipeline once: field resolution,
/// normalization, then deduplication. The resulting set is immutable;
/// loading new data means building a new journal.
#[derive(Debug, Clone, Default)]
pub struct TradeJournal {
    trades: Vec<NormalizedTrade>,
    report: NormalizeReport,
}

impl TradeJournal {
    /// Ingest raw rows with the default currency symbols.
    pub fn from_raw_rows(rows: &[RawRow]) -> Self {
        Self::from_raw_rows_with_symbols(rows, DEFAULT_CURRENCY_SYMBOLS)
    }

    /// Ingest raw rows: normalize with the configured currency symbols,
    /// drop dateless rows, deduplicate.
    pub fn from_raw_rows_with_symbols(rows: &[RawRow], currency_symbols: &str) -> Self {
        let (normalized, report) = normalize_rows_with_symbols(rows, currency_symbols);
        let trades = deduplicate(normalized);
        info!(
            rows_in = report.rows_in,
            dropped = report.dropped_no_date,
            trades = trades.len(),
            "journal ingested"
        );
        Self { trades, report }
    }

    /// Build a journal from already-normalized trades (deduplication is
    /// still applied).
    pub fn from_trades(trades: Vec<NormalizedTrade>) -> Self {
        let report = NormalizeReport {
            rows_in: trades.len(),
            dropped_no_date: 0,
        };
        Self {
            trades: deduplicate(trades),
            report,
        }
    }

    /// The deduplicated trade set, in ingestion order
    pub fn trades(&self) -> &[NormalizedTrade] {
        &self.trades
    }

    /// True when every row was dropped or none were supplied
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Ingestion diagnostics (row and drop counts)
    pub fn report(&self) -> NormalizeReport {
        self.report
    }

    /// Distinct canonical tickers, ordered by trade count descending.
    /// Ties keep first-seen order. Drives a market selector.
    pub fn markets(&self) -> Vec<String> {
        let mut counts: AHashMap<&str, u32> = AHashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for trade in &self.trades {
            let entry = counts.entry(trade.market.as_str()).or_insert(0);
            if *entry == 0 {
                order.push(trade.market.as_str());
            }
            *entry += 1;
        }
        order.sort_by_key(|market| std::cmp::Reverse(counts[*market]));
        order.into_iter().map(String::from).collect()
    }

    /// Distinct trade years, ascending. Drives a year selector.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.trades.iter().map(|t| t.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Rebuild all four bucket maps for the given filter. Whole-pass:
    /// previous results are discarded, never merged.
    pub fn summaries(&self, filter: &MarketFilter) -> CalendarSummaries {
        build_summaries(&self.trades, filter)
    }

    /// Matching trades for one period, chronologically sorted by close
    /// time (stable; ties keep ingestion order).
    pub fn trades_in_period(&self, filter: &MarketFilter, period: Period) -> Vec<&NormalizedTrade> {
        let mut matching: Vec<&NormalizedTrade> = self
            .trades
            .iter()
            .filter(|t| filter.matches(t) && period.contains(t))
            .collect();
        matching.sort_by_key(|t| t.close_time);
        matching
    }

    /// Cumulative-P&L excursion for one period, or `None` when the period
    /// holds no matching trades.
    pub fn excursion(&self, filter: &MarketFilter, period: Period) -> Option<Excursion> {
        cumulative_excursion(self.trades_in_period(filter, period).into_iter())
    }

    /// Per-market totals for one day, sorted by total descending.
    pub fn day_market_breakdown(
        &self,
        filter: &MarketFilter,
        year: i32,
        month: u32,
        day: u32,
    ) -> Vec<MarketDaySummary> {
        let period = Period::Day { year, month, day };
        let mut by_market: AHashMap<String, MarketDaySummary> = AHashMap::new();
        let mut order: Vec<String> = Vec::new();

        for trade in self.trades_in_period(filter, period) {
            let entry = by_market
                .entry(trade.market.clone())
                .or_insert_with(|| {
                    order.push(trade.market.clone());
                    MarketDaySummary {
                        market: trade.market.clone(),
                        total: 0.0,
                        points: 0.0,
                        count: 0,
                    }
                });
            entry.total += trade.amount;
            entry.points += trade.points;
            entry.count += 1;
        }

        let mut breakdown: Vec<MarketDaySummary> = order
            .into_iter()
            .map(|market| by_market.remove(&market).expect("market was just inserted"))
            .collect();
        breakdown.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        breakdown
    }
}
