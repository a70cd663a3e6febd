//! Dividend yield and P/E ratio.
//!
//! Pure functions over a [`StockRecord`] and a market price. Both reject a
//! non-positive price with [`MarketError::InvalidPrice`].

use crate::domain::error::MarketError;
use crate::domain::stock::StockRecord;

/// Common: last_dividend / price. Preferred: fixed_rate * par_value / price.
pub fn dividend_yield(stock: &StockRecord, price: f64) -> Result<f64, MarketError> {
    check_price(price)?;
    Ok(stock.dividend_amount() / price)
}

/// price / (dividend_yield * price), or `None` when that dividend is not positive.
pub fn pe_ratio(stock: &StockRecord, price: f64) -> Result<Option<f64>, MarketError> {
    let dividend = dividend_yield(stock, price)? * price;
    if dividend <= 0.0 {
        return Ok(None);
    }
    Ok(Some(price / dividend))
}

pub(crate) fn check_price(price: f64) -> Result<(), MarketError> {
    if !(price.is_finite() && price > 0.0) {
        return Err(MarketError::InvalidPrice { price });
    }
    Ok(())
}
