//! Stock records and the default catalog seed.

use crate::domain::error::MarketError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockType {
    Common,
    Preferred,
}

impl fmt::Display for StockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockType::Common => write!(f, "COMMON"),
            StockType::Preferred => write!(f, "PREFERRED"),
        }
    }
}

impl FromStr for StockType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COMMON" => Ok(StockType::Common),
            "PREFERRED" => Ok(StockType::Preferred),
            other => Err(format!("unknown stock type '{other}'")),
        }
    }
}

/// Static per-stock parameters held by a catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct StockRecord {
    pub symbol: String,
    pub stock_type: StockType,
    pub last_dividend: f64,
    /// Fraction in [0, 1]. Always 0 for common stock.
    pub fixed_dividend_rate: f64,
    pub par_value: f64,
}

impl StockRecord {
    /// Validating constructor. The fixed dividend rate of a common stock is
    /// meaningless and is stored as 0 whatever is passed.
    pub fn new(
        symbol: &str,
        stock_type: StockType,
        last_dividend: f64,
        fixed_dividend_rate: Option<f64>,
        par_value: f64,
    ) -> Result<Self, MarketError> {
        let fixed_dividend_rate = match stock_type {
            StockType::Common => 0.0,
            StockType::Preferred => fixed_dividend_rate.unwrap_or(0.0),
        };
        let stock = StockRecord {
            symbol: symbol.trim().to_uppercase(),
            stock_type,
            last_dividend,
            fixed_dividend_rate,
            par_value,
        };
        stock.validate()?;
        Ok(stock)
    }

    /// Checks the record invariants. Catalogs call this on records that may
    /// have been built field by field.
    pub fn validate(&self) -> Result<(), MarketError> {
        let invalid = |reason: &str| {
            Err(MarketError::InvalidStock {
                symbol: self.symbol.clone(),
                reason: reason.to_string(),
            })
        };

        if self.symbol.trim().is_empty() {
            return invalid("symbol must not be empty");
        }
        if !self.last_dividend.is_finite() || self.last_dividend < 0.0 {
            return invalid("last_dividend must be non-negative");
        }
        if !self.par_value.is_finite() || self.par_value <= 0.0 {
            return invalid("par_value must be positive");
        }
        match self.stock_type {
            StockType::Common if self.fixed_dividend_rate != 0.0 => {
                invalid("common stock cannot have a fixed dividend rate")
            }
            StockType::Preferred if !(0.0..=1.0).contains(&self.fixed_dividend_rate) => {
                invalid("fixed_dividend_rate must be between 0 and 1")
            }
            _ => Ok(()),
        }
    }

    pub fn common(symbol: &str, last_dividend: f64, par_value: f64) -> Result<Self, MarketError> {
        Self::new(symbol, StockType::Common, last_dividend, None, par_value)
    }

    pub fn preferred(
        symbol: &str,
        last_dividend: f64,
        fixed_dividend_rate: f64,
        par_value: f64,
    ) -> Result<Self, MarketError> {
        Self::new(
            symbol,
            StockType::Preferred,
            last_dividend,
            Some(fixed_dividend_rate),
            par_value,
        )
    }

    /// Dividend paid per share: last dividend for common stock,
    /// fixed rate times par value for preferred.
    pub fn dividend_amount(&self) -> f64 {
        match self.stock_type {
            StockType::Common => self.last_dividend,
            StockType::Preferred => self.fixed_dividend_rate * self.par_value,
        }
    }
}

/// The five-stock seed used when no stock data file is configured.
pub fn default_stocks() -> Vec<StockRecord> {
    vec![
        seed("TEA", StockType::Common, 0.0, 0.0, 100.0),
        seed("POP", StockType::Common, 8.0, 0.0, 100.0),
        seed("ALE", StockType::Common, 23.0, 0.0, 60.0),
        seed("GIN", StockType::Preferred, 8.0, 0.02, 100.0),
        seed("JOE", StockType::Common, 13.0, 0.0, 250.0),
    ]
}

fn seed(
    symbol: &str,
    stock_type: StockType,
    last_dividend: f64,
    fixed_dividend_rate: f64,
    par_value: f64,
) -> StockRecord {
    StockRecord {
        symbol: symbol.to_string(),
        stock_type,
        last_dividend,
        fixed_dividend_rate,
        par_value,
    }
}
