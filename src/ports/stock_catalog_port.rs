//! Stock catalog port trait.

use crate::domain::error::MarketError;
use crate::domain::stock::StockRecord;

pub trait StockCatalog {
    /// Fails with [`MarketError::NotFound`] when the symbol is absent.
    fn get(&self, symbol: &str) -> Result<StockRecord, MarketError>;

    /// Fails with [`MarketError::AlreadyExists`] when the symbol is present.
    fn add(&mut self, stock: StockRecord) -> Result<(), MarketError>;

    /// Fails with [`MarketError::NotFound`] when the symbol is absent.
    fn remove(&mut self, symbol: &str) -> Result<StockRecord, MarketError>;

    fn list(&self) -> Vec<StockRecord>;

    fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_ok()
    }
}
