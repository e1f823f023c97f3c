//! Core trade journal aggregation engine
//!
//! Turns loosely structured trade-export rows into time-bucketed P&L
//! summaries and cumulative-P&L excursion statistics for calendar-style
//! visualization.
//!
//! ## Pipeline
//!
//! - Field resolution: locate amount, price levels, and timestamps under
//!   varying real-world column names
//! - Normalization: canonical trade records; rows without a resolvable
//!   primary date are dropped
//! - Deduplication: one trade per non-empty reference, settled amounts
//!   winning over zero-amount placeholders
//! - Temporal aggregation: daily/weekly/monthly/yearly buckets under an
//!   explicit market filter
//! - Excursion calculation: per-period cumulative-P&L open/high/low/close
//!
//! The engine is pure, synchronous, and whole-pass: every query recomputes
//! from the deduplicated in-memory trade set, and repeating a query with
//! the same filter reproduces identical output. It performs no I/O;
//! decoding delimited text into [`RawRow`]s is a collaborator's job.

pub mod aggregate;
pub mod dedup;
pub mod excursion;
pub mod journal;
pub mod normalize;
pub mod resolve;
pub mod types;

pub use aggregate::{build_summaries, week_number, Bucket, CalendarSummaries};
pub use dedup::deduplicate;
pub use excursion::{cumulative_excursion, Excursion};
pub use journal::{MarketDaySummary, TradeJournal};
pub use normalize::{
    canonical_ticker, normalize_row, normalize_row_with_symbols, normalize_rows,
    normalize_rows_with_symbols, NormalizeReport,
};
pub use types::{Granularity, MarketFilter, NormalizedTrade, Period, RawRow, RawValue};
