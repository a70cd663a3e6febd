//! In-memory stock catalog keyed by symbol.

use crate::domain::error::MarketError;
use crate::domain::stock::{default_stocks, StockRecord};
use crate::ports::stock_catalog_port::StockCatalog;
use log::info;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStockCatalog {
    stocks: BTreeMap<String, StockRecord>,
}

impl InMemoryStockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_stocks() -> Self {
        let mut catalog = Self::new();
        for stock in default_stocks() {
            catalog.stocks.insert(stock.symbol.clone(), stock);
        }
        catalog
    }

    /// Builds a catalog from records, failing on the first duplicate symbol.
    pub fn from_records(records: Vec<StockRecord>) -> Result<Self, MarketError> {
        let mut catalog = Self::new();
        for stock in records {
            catalog.add(stock)?;
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}

impl StockCatalog for InMemoryStockCatalog {
    fn get(&self, symbol: &str) -> Result<StockRecord, MarketError> {
        self.stocks
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketError::NotFound {
                symbol: symbol.to_string(),
            })
    }

    fn add(&mut self, stock: StockRecord) -> Result<(), MarketError> {
        stock.validate()?;
        if self.stocks.contains_key(&stock.symbol) {
            return Err(MarketError::AlreadyExists {
                symbol: stock.symbol,
            });
        }
        info!("added stock {} ({})", stock.symbol, stock.stock_type);
        self.stocks.insert(stock.symbol.clone(), stock);
        Ok(())
    }

    fn remove(&mut self, symbol: &str) -> Result<StockRecord, MarketError> {
        let stock = self
            .stocks
            .remove(symbol)
            .ok_or_else(|| MarketError::NotFound {
                symbol: symbol.to_string(),
            })?;
        info!("removed stock {}", symbol);
        Ok(stock)
    }

    fn list(&self) -> Vec<StockRecord> {
        self.stocks.values().cloned().collect()
    }

    fn contains(&self, symbol: &str) -> bool {
        self.stocks.contains_key(symbol)
    }
}
