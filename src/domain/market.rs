//! Market-wide queries over a stock catalog and a trade log.
//!
//! [`Market`] borrows its collaborators: trades are appended to the borrowed
//! [`TradeLog`], stocks are resolved through the borrowed [`StockCatalog`] and
//! every call reads the borrowed [`Clock`] exactly once, so a window boundary
//! and any timestamp written in the same call agree.

use crate::domain::error::MarketError;
use crate::domain::pricing::{self, check_price};
use crate::domain::stock::StockRecord;
use crate::domain::trade::{Side, TradeRecord};
use crate::ports::clock_port::Clock;
use crate::ports::stock_catalog_port::StockCatalog;
use crate::ports::trade_log_port::TradeLog;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};

pub const DEFAULT_VWSP_WINDOW_SECONDS: i64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketConfig {
    /// Trailing window for the volume weighted stock price.
    pub window: Duration,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            window: Duration::seconds(DEFAULT_VWSP_WINDOW_SECONDS),
        }
    }
}

pub struct Market<'a> {
    catalog: &'a dyn StockCatalog,
    trades: &'a mut dyn TradeLog,
    clock: &'a dyn Clock,
    config: MarketConfig,
}

impl<'a> Market<'a> {
    pub fn new(
        catalog: &'a dyn StockCatalog,
        trades: &'a mut dyn TradeLog,
        clock: &'a dyn Clock,
    ) -> Self {
        Self::with_config(catalog, trades, clock, MarketConfig::default())
    }

    pub fn with_config(
        catalog: &'a dyn StockCatalog,
        trades: &'a mut dyn TradeLog,
        clock: &'a dyn Clock,
        config: MarketConfig,
    ) -> Self {
        Market {
            catalog,
            trades,
            clock,
            config,
        }
    }

    pub fn trades(&self) -> &dyn TradeLog {
        &*self.trades
    }

    /// Records a trade stamped with the current instant. Nothing is appended
    /// when the symbol, quantity or price is rejected.
    pub fn record_trade(
        &mut self,
        symbol: &str,
        quantity: u64,
        side: Side,
        price: f64,
    ) -> Result<TradeRecord, MarketError> {
        let stock = self.resolve(symbol)?;
        if quantity == 0 {
            return Err(MarketError::InvalidQuantity { quantity });
        }
        check_price(price)?;

        let now = self.clock.now();
        let trade = self
            .trades
            .append(&stock.symbol, quantity, side, price, now);
        info!(
            "recorded {} {} {} @ {} at {}",
            trade.side, trade.quantity, trade.stock_symbol, trade.price, trade.timestamp
        );
        Ok(trade)
    }

    pub fn dividend_yield(&self, symbol: &str, price: f64) -> Result<f64, MarketError> {
        let stock = self.resolve(symbol)?;
        pricing::dividend_yield(&stock, price)
    }

    pub fn pe_ratio(&self, symbol: &str, price: f64) -> Result<Option<f64>, MarketError> {
        let stock = self.resolve(symbol)?;
        pricing::pe_ratio(&stock, price)
    }

    /// Volume weighted price over the configured trailing window, or `None`
    /// when the window holds no trades for the symbol.
    pub fn volume_weighted_price(&self, symbol: &str) -> Result<Option<f64>, MarketError> {
        self.volume_weighted_price_within(symbol, self.config.window)
    }

    /// Volume weighted price over the trailing `window` ending now.
    pub fn volume_weighted_price_within(
        &self,
        symbol: &str,
        window: Duration,
    ) -> Result<Option<f64>, MarketError> {
        let stock = self.resolve(symbol)?;
        Ok(self.vwsp_at(&stock.symbol, self.clock.now(), window))
    }

    /// Geometric mean of the in-window VWSP of every traded symbol.
    ///
    /// Symbols whose trades have all aged out of the window contribute
    /// nothing, so this is `None` whenever no symbol traded recently.
    pub fn geometric_all_share_index(&self) -> Option<f64> {
        let now = self.clock.now();
        let mut prices = Vec::new();

        for symbol in self.trades.symbols_with_trades() {
            if !self.catalog.contains(&symbol) {
                warn!("skipping {} in all-share index: no longer in catalog", symbol);
                continue;
            }
            match self.vwsp_at(&symbol, now, self.config.window) {
                Some(vwsp) => prices.push(vwsp),
                None => debug!("no trades for {} inside the window", symbol),
            }
        }

        let index = geometric_mean(&prices);
        debug!(
            "all-share index over {} symbols: {:?}",
            prices.len(),
            index
        );
        index
    }

    fn resolve(&self, symbol: &str) -> Result<StockRecord, MarketError> {
        self.catalog.get(symbol).map_err(|e| match e {
            MarketError::NotFound { symbol } => MarketError::UnknownStock { symbol },
            other => other,
        })
    }

    fn vwsp_at(&self, symbol: &str, now: DateTime<Utc>, window: Duration) -> Option<f64> {
        let since = now
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let trades = self.trades.query(symbol, since);
        let vwsp = volume_weighted_price(&trades);
        debug!(
            "{}: {} trades since {}, vwsp {:?}",
            symbol,
            trades.len(),
            since,
            vwsp
        );
        vwsp
    }
}

/// Σ(price · quantity) / Σ(quantity), or `None` for no volume.
pub fn volume_weighted_price(trades: &[TradeRecord]) -> Option<f64> {
    // Cannot overflow: a slice holds fewer than 2^64 trades.
    let (notional, volume) = trades.iter().fold((0.0, 0u128), |(n, v), t| {
        (n + t.notional(), v + u128::from(t.quantity))
    });
    if volume == 0 {
        return None;
    }
    Some(notional / volume as f64)
}

/// n-th root of the product, computed in log space. `None` for an empty slice.
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    match values {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }
    let log_sum: f64 = values.iter().map(|v| v.ln()).sum();
    Some((log_sum / values.len() as f64).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::adapters::memory_catalog::InMemoryStockCatalog;
    use crate::adapters::memory_trade_log::InMemoryTradeLog;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }

    fn trade_at(symbol: &str, quantity: u64, price: f64, at: DateTime<Utc>) -> TradeRecord {
        TradeRecord {
            stock_symbol: symbol.into(),
            timestamp: at,
            quantity,
            side: Side::Buy,
            price,
        }
    }

    #[test]
    fn vwsp_weights_by_quantity() {
        let trades = vec![
            trade_at("ALE", 100, 100.0, start()),
            trade_at("ALE", 300, 120.0, start()),
        ];
        // (100*100 + 300*120) / 400 = 115
        assert_relative_eq!(volume_weighted_price(&trades).unwrap(), 115.0);
    }

    #[test]
    fn vwsp_of_nothing_is_none() {
        assert_eq!(volume_weighted_price(&[]), None);
    }

    #[test]
    fn geometric_mean_of_known_values() {
        assert_relative_eq!(geometric_mean(&[2.0, 8.0]).unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(geometric_mean(&[5.0]).unwrap(), 5.0, epsilon = 1e-12);
        assert_eq!(geometric_mean(&[]), None);
    }

    #[test]
    fn default_window_is_five_minutes() {
        assert_eq!(MarketConfig::default().window, Duration::minutes(5));
    }

    #[test]
    fn record_trade_stamps_with_clock() {
        let catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());
        let mut market = Market::new(&catalog, &mut log, &clock);

        let trade = market.record_trade("TEA", 100, Side::Buy, 150.0).unwrap();
        assert_eq!(trade.timestamp, start());
        assert_eq!(trade.stock_symbol, "TEA");
        assert_eq!(market.trades().len(), 1);
    }

    #[test]
    fn record_trade_rejects_bad_input_without_appending() {
        let catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());
        let mut market = Market::new(&catalog, &mut log, &clock);

        assert!(matches!(
            market.record_trade("AAPL", 100, Side::Buy, 150.0),
            Err(MarketError::UnknownStock { .. })
        ));
        assert!(matches!(
            market.record_trade("TEA", 0, Side::Buy, 150.0),
            Err(MarketError::InvalidQuantity { quantity: 0 })
        ));
        assert!(matches!(
            market.record_trade("TEA", 10, Side::Sell, -1.0),
            Err(MarketError::InvalidPrice { .. })
        ));
        assert!(market.trades().is_empty());
    }

    #[test]
    fn window_is_inclusive_at_boundary() {
        let catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());

        {
            let mut market = Market::new(&catalog, &mut log, &clock);
            market.record_trade("ALE", 100, Side::Buy, 100.0).unwrap();
        }
        clock.advance(Duration::minutes(5));

        let market = Market::new(&catalog, &mut log, &clock);
        assert_eq!(market.volume_weighted_price("ALE").unwrap(), Some(100.0));

        clock.advance(Duration::milliseconds(1));
        assert_eq!(market.volume_weighted_price("ALE").unwrap(), None);
    }

    #[test]
    fn custom_window_is_respected() {
        let catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());
        let config = MarketConfig {
            window: Duration::seconds(30),
        };
        let mut market = Market::with_config(&catalog, &mut log, &clock, config);

        market.record_trade("POP", 10, Side::Buy, 100.0).unwrap();
        clock.advance(Duration::seconds(31));
        assert_eq!(market.volume_weighted_price("POP").unwrap(), None);
    }

    #[test]
    fn index_ignores_symbols_dropped_from_catalog() {
        let mut catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());

        log.append("POP", 100, Side::Buy, 100.0, start());
        log.append("JOE", 100, Side::Buy, 400.0, start());
        catalog.remove("JOE").unwrap();

        let market = Market::new(&catalog, &mut log, &clock);
        assert_relative_eq!(
            market.geometric_all_share_index().unwrap(),
            100.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn single_symbol_index_equals_its_vwsp() {
        assert_eq!(geometric_mean(&[100.0]), Some(100.0));

        let catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());
        let mut market = Market::new(&catalog, &mut log, &clock);
        market.record_trade("POP", 100, Side::Buy, 100.0).unwrap();
        assert_eq!(market.geometric_all_share_index(), Some(100.0));
    }

    #[test]
    fn vwsp_survives_volume_beyond_u64() {
        let catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());
        let mut market = Market::new(&catalog, &mut log, &clock);

        market.record_trade("ALE", u64::MAX, Side::Buy, 100.0).unwrap();
        market.record_trade("ALE", 1, Side::Sell, 100.0).unwrap();

        let vwsp = market.volume_weighted_price("ALE").unwrap().unwrap();
        assert_relative_eq!(vwsp, 100.0, max_relative = 1e-12);
        assert!(market.geometric_all_share_index().is_some());
    }

    #[test]
    fn per_call_window_overrides_configured_window() {
        let catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());
        let mut market = Market::new(&catalog, &mut log, &clock);

        market.record_trade("POP", 100, Side::Buy, 100.0).unwrap();
        clock.advance(Duration::minutes(2));
        market.record_trade("POP", 100, Side::Buy, 200.0).unwrap();

        assert_eq!(market.volume_weighted_price("POP").unwrap(), Some(150.0));
        assert_eq!(
            market
                .volume_weighted_price_within("POP", Duration::minutes(1))
                .unwrap(),
            Some(200.0)
        );

        clock.advance(Duration::minutes(4));
        assert_eq!(market.volume_weighted_price("POP").unwrap(), None);
        assert_eq!(
            market
                .volume_weighted_price_within("POP", Duration::minutes(10))
                .unwrap(),
            Some(150.0)
        );
    }

    #[test]
    fn per_call_window_checks_symbol() {
        let catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());
        let market = Market::new(&catalog, &mut log, &clock);
        assert!(matches!(
            market.volume_weighted_price_within("AAPL", Duration::minutes(1)),
            Err(MarketError::UnknownStock { .. })
        ));
    }

    #[test]
    fn metrics_map_missing_stock_to_unknown() {
        let catalog = InMemoryStockCatalog::with_default_stocks();
        let mut log = InMemoryTradeLog::new();
        let clock = ManualClock::new(start());
        let market = Market::new(&catalog, &mut log, &clock);

        assert!(matches!(
            market.dividend_yield("AAPL", 100.0),
            Err(MarketError::UnknownStock { symbol }) if symbol == "AAPL"
        ));
        assert!(matches!(
            market.pe_ratio("AAPL", 100.0),
            Err(MarketError::UnknownStock { .. })
        ));
        assert!(matches!(
            market.volume_weighted_price("AAPL"),
            Err(MarketError::UnknownStock { .. })
        ));
    }
}
