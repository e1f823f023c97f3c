//! Duplicate trade collapse
//!
//! Journal exports frequently contain the same trade more than once: a
//! zero-amount placeholder row written when the position opened, then the
//! settled row with the realized amount, both carrying the same reference.

use crate::types::NormalizedTrade;
use ahash::AHashMap;
use tracing::debug;

/// Collapse duplicate submissions of the same trade.
///
/// Trades sharing a non-empty reference keep the first record encountered,
/// except that a non-zero-amount record always replaces a zero-amount
/// placeholder at the same position in the output. Trades with an empty
/// reference are never deduplicated against each other: they are kept in
/// encounter order as distinct trades.
pub fn deduplicate(trades: Vec<NormalizedTrade>) -> Vec<NormalizedTrade> {
    let rows_in = trades.len();
    let mut kept: Vec<NormalizedTrade> = Vec::with_capacity(trades.len());
    let mut by_reference: AHashMap<String, usize> = AHashMap::new();

    for trade in trades {
        if trade.reference.is_empty() {
            kept.push(trade);
            continue;
        }

        match by_reference.get(&trade.reference) {
            Some(&idx) => {
                if kept[idx].amount == 0.0 && trade.amount != 0.0 {
                    kept[idx] = trade;
                }
            }
            None => {
                by_reference.insert(trade.reference.clone(), kept.len());
                kept.push(trade);
            }
        }
    }

    if kept.len() < rows_in {
        debug!(
            rows_in,
            kept = kept.len(),
            collapsed = rows_in - kept.len(),
            "collapsed duplicate trade references"
        );
    }

    kept
}
