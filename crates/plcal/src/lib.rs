//! Trade journal P&L calendar engine
//!
//! This is a meta-crate that re-exports the plcal sub-crates:
//!
//! - `plcal-core` - normalization, deduplication, and temporal aggregation
//! - `plcal-config` - configuration management
//! - `plcal-io` - journal export decoding
//!
//! ## Basic Usage
//!
//! ```rust
//! use plcal::{MarketFilter, Period, RawRow, TradeJournal};
//!
//! let mut row = RawRow::new();
//! row.push("Reference", "A1");
//! row.push("MarketName", "FTSE 100 (£1 Mini)");
//! row.push("PL Amount", "£150.00");
//! row.push("DateUtc", "2025-10-02T14:30:00");
//!
//! let journal = TradeJournal::from_raw_rows(&[row]);
//! let summaries = journal.summaries(&MarketFilter::AllMarkets);
//! assert_eq!(summaries.daily.get(&(2025, 10, 2)).unwrap().total, 150.0);
//!
//! let ohlc = journal
//!     .excursion(&MarketFilter::AllMarkets, Period::Day { year: 2025, month: 10, day: 2 })
//!     .unwrap();
//! assert_eq!(ohlc.close, 150.0);
//! ```

pub use plcal_core as core;

pub use plcal_config as config;

pub use plcal_io as io;

// Re-export commonly used types at crate root for convenience
pub use plcal_core::{
    build_summaries, canonical_ticker, cumulative_excursion, deduplicate, normalize_row,
    normalize_rows, week_number, Bucket, CalendarSummaries, Excursion, Granularity,
    MarketDaySummary, MarketFilter, NormalizeReport, NormalizedTrade, Period, RawRow, RawValue,
    TradeJournal,
};

pub use plcal_config::Settings;

pub use plcal_io::{read_rows, read_rows_from_path, LoadError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
