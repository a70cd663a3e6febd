//! In-memory append-only trade log.
//!
//! Queries are a linear scan, which is plenty for a single user's session.

use crate::domain::trade::{Side, TradeRecord};
use crate::ports::trade_log_port::TradeLog;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct InMemoryTradeLog {
    trades: Vec<TradeRecord>,
}

impl InMemoryTradeLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TradeLog for InMemoryTradeLog {
    fn append(
        &mut self,
        symbol: &str,
        quantity: u64,
        side: Side,
        price: f64,
        now: DateTime<Utc>,
    ) -> TradeRecord {
        let trade = TradeRecord {
            stock_symbol: symbol.to_string(),
            timestamp: now,
            quantity,
            side,
            price,
        };
        self.trades.push(trade.clone());
        trade
    }

    fn query(&self, symbol: &str, since: DateTime<Utc>) -> Vec<TradeRecord> {
        self.trades
            .iter()
            .filter(|t| t.stock_symbol == symbol && t.timestamp >= since)
            .cloned()
            .collect()
    }

    fn symbols_with_trades(&self) -> BTreeSet<String> {
        self.trades.iter().map(|t| t.stock_symbol.clone()).collect()
    }

    fn len(&self) -> usize {
        self.trades.len()
    }
}
