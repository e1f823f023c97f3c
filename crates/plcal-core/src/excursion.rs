//! Cumulative-P&L excursion ("OHLC") calculation
//!
//! Replays a period's trades in chronological order, accumulating P&L from
//! a baseline of 0, and reports the open/high/low/close of that cumulative
//! path for candlestick-style charting.

use crate::types::NormalizedTrade;
use serde::{Deserialize, Serialize};

/// Open/high/low/close view of one period's running cumulative P&L.
///
/// The baseline 0 is part of the replayed path: `open` is always 0,
/// `high` is never negative, and `low` is never positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Excursion {
    /// Cumulative-P&L baseline at the start of the period; always 0
    pub open: f64,
    /// Maximum cumulative sum observed, floored at 0
    pub high: f64,
    /// Minimum cumulative sum observed, capped at 0
    pub low: f64,
    /// Cumulative sum after the final trade
    pub close: f64,
}

/// Compute the excursion summary for one period's trades.
///
/// Trades are replayed in ascending close-time order (stable: ties keep
/// the given order). Returns `None` for an empty set, which callers must
/// render as a neutral placeholder rather than a zero-value bar.
pub fn cumulative_excursion<'a, I>(trades: I) -> Option<Excursion>
where
    I: IntoIterator<Item = &'a NormalizedTrade>,
{
    let mut ordered: Vec<&NormalizedTrade> = trades.into_iter().collect();
    if ordered.is_empty() {
        return None;
    }
    ordered.sort_by_key(|trade| trade.close_time);

    let mut cumulative = 0.0;
    let mut high = f64::MIN;
    let mut low = f64::MAX;

    for trade in &ordered {
        cumulative += trade.amount;
        high = high.max(cumulative);
        low = low.min(cumulative);
    }

    Some(Excursion {
        open: 0.0,
        high: high.max(0.0),
        low: low.min(0.0),
        close: cumulative,
    })
}
