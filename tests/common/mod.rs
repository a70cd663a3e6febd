#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::io::Write;
pub use stockmetrics::adapters::clock::ManualClock;
pub use stockmetrics::adapters::memory_catalog::InMemoryStockCatalog;
pub use stockmetrics::adapters::memory_trade_log::InMemoryTradeLog;
use stockmetrics::domain::trade::{Side, TradeRecord};
use stockmetrics::ports::trade_log_port::TradeLog;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

pub fn seeded() -> (InMemoryStockCatalog, InMemoryTradeLog, ManualClock) {
    (
        InMemoryStockCatalog::with_default_stocks(),
        InMemoryTradeLog::new(),
        ManualClock::new(t0()),
    )
}

/// Appends directly to the log, bypassing the market, to place a trade at an
/// arbitrary instant.
pub fn backdate(
    log: &mut InMemoryTradeLog,
    symbol: &str,
    quantity: u64,
    price: f64,
    at: DateTime<Utc>,
) -> TradeRecord {
    log.append(symbol, quantity, Side::Buy, price, at)
}

pub fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
