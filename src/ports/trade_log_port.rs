//! Trade log port trait.
//!
//! An append-only store of trades. Callers only sum over query results, so
//! implementations are free to return records in any order.

use crate::domain::trade::{Side, TradeRecord};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

pub trait TradeLog {
    /// Appends a trade stamped with `now` and returns the stored record.
    /// Symbol validation is the caller's concern.
    fn append(
        &mut self,
        symbol: &str,
        quantity: u64,
        side: Side,
        price: f64,
        now: DateTime<Utc>,
    ) -> TradeRecord;

    /// All trades of `symbol` with `timestamp >= since`.
    fn query(&self, symbol: &str, since: DateTime<Utc>) -> Vec<TradeRecord>;

    fn symbols_with_trades(&self) -> BTreeSet<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
