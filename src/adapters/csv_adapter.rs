//! CSV data files for the stock catalog and trade replays.
//!
//! Stock files: `symbol,type,last_dividend,fixed_dividend,par_value`, where
//! `fixed_dividend` is a percentage (2 means 2%) and may be left empty.
//! Trade files: `symbol,quantity,side,price`.

use crate::domain::error::MarketError;
use crate::domain::stock::{StockRecord, StockType};
use crate::domain::trade::Side;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A trade read from a file, not yet recorded or timestamped.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRow {
    pub symbol: String,
    pub quantity: u64,
    pub side: Side,
    pub price: f64,
}

pub fn load_stocks<P: AsRef<Path>>(path: P) -> Result<Vec<StockRecord>, MarketError> {
    let path = path.as_ref();
    let content = read(path)?;
    parse_stocks(&content, &path.display().to_string())
}

pub fn load_trades<P: AsRef<Path>>(path: P) -> Result<Vec<TradeRow>, MarketError> {
    let path = path.as_ref();
    let content = read(path)?;
    parse_trades(&content, &path.display().to_string())
}

pub fn parse_stocks(content: &str, file: &str) -> Result<Vec<StockRecord>, MarketError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut stocks = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| data_error(file, format!("CSV parse error: {}", e)))?;

        let symbol = column(&record, 0, "symbol", file)?;
        let stock_type = column(&record, 1, "type", file)?
            .parse::<StockType>()
            .map_err(|reason| MarketError::InvalidStock {
                symbol: symbol.to_string(),
                reason,
            })?;
        let last_dividend: f64 = parse_column(&record, 2, "last_dividend", file)?;
        let fixed_dividend = match record.get(3) {
            Some(s) if !s.is_empty() => Some(s.parse::<f64>().map_err(|e| {
                data_error(file, format!("invalid fixed_dividend value: {}", e))
            })? / 100.0),
            _ => None,
        };
        let par_value: f64 = parse_column(&record, 4, "par_value", file)?;

        stocks.push(StockRecord::new(
            symbol,
            stock_type,
            last_dividend,
            fixed_dividend,
            par_value,
        )?);
    }

    Ok(stocks)
}

pub fn parse_trades(content: &str, file: &str) -> Result<Vec<TradeRow>, MarketError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut trades = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| data_error(file, format!("CSV parse error: {}", e)))?;

        let symbol = column(&record, 0, "symbol", file)?.to_uppercase();
        let quantity: u64 = parse_column(&record, 1, "quantity", file)?;
        let side = column(&record, 2, "side", file)?
            .parse::<Side>()
            .map_err(|reason| data_error(file, reason))?;
        let price: f64 = parse_column(&record, 3, "price", file)?;

        trades.push(TradeRow {
            symbol,
            quantity,
            side,
            price,
        });
    }

    Ok(trades)
}

fn read(path: &Path) -> Result<String, MarketError> {
    fs::read_to_string(path).map_err(|e| MarketError::DataFile {
        file: path.display().to_string(),
        reason: format!("failed to read: {}", e),
    })
}

fn column<'r>(
    record: &'r csv::StringRecord,
    index: usize,
    name: &str,
    file: &str,
) -> Result<&'r str, MarketError> {
    record
        .get(index)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| data_error(file, format!("missing {} column", name)))
}

fn parse_column<T>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    file: &str,
) -> Result<T, MarketError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    column(record, index, name, file)?
        .parse()
        .map_err(|e| data_error(file, format!("invalid {} value: {}", name, e)))
}

fn data_error(file: &str, reason: String) -> MarketError {
    MarketError::DataFile {
        file: file.to_string(),
        reason,
    }
}
