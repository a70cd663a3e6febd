//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::clock::SystemClock;
use crate::adapters::csv_adapter::{self, TradeRow};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::memory_catalog::InMemoryStockCatalog;
use crate::adapters::memory_trade_log::InMemoryTradeLog;
use crate::domain::config_validation::{
    build_market_config, log_level, stocks_file, validate_market_config,
};
use crate::domain::error::MarketError;
use crate::domain::market::{Market, MarketConfig};
use crate::ports::clock_port::Clock;
use crate::ports::config_port::ConfigPort;
use crate::ports::stock_catalog_port::StockCatalog;

#[derive(Parser, Debug)]
#[command(name = "stockmetrics", about = "Stock market metrics calculator")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Stock data CSV, overrides [market] stocks_file
    #[arg(long, global = true)]
    pub stocks: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the stock catalog
    Stocks,
    /// Dividend yield of a stock at a price
    DividendYield {
        #[arg(long)]
        symbol: String,
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
    },
    /// P/E ratio of a stock at a price
    PeRatio {
        #[arg(long)]
        symbol: String,
        #[arg(long, allow_negative_numbers = true)]
        price: f64,
    },
    /// Record trades from a CSV file and report VWSP and the all-share index
    Replay {
        #[arg(short, long)]
        trades: PathBuf,
    },
}

/// Outcome of replaying a trade file.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub recorded: usize,
    pub vwsp: BTreeMap<String, Option<f64>>,
    pub all_share_index: Option<f64>,
}

pub fn run(cli: Cli) -> ExitCode {
    let config = match cli.config.as_ref() {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(code) => return code,
        },
        None => FileConfigAdapter::empty(),
    };

    if let Err(e) = validate_market_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    init_logging(&config);

    let catalog = match load_catalog(cli.stocks.as_deref(), &config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let result = match cli.command {
        Command::Stocks => {
            print_stocks(&catalog);
            Ok(())
        }
        Command::DividendYield { symbol, price } => run_dividend_yield(&catalog, &symbol, price),
        Command::PeRatio { symbol, price } => run_pe_ratio(&catalog, &symbol, price),
        Command::Replay { trades } => run_replay(&catalog, &config, &trades),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: reading {}: {err}", path.display());
        ExitCode::from(&err)
    })
}

/// `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &dyn ConfigPort) {
    let env = env_logger::Env::default().default_filter_or(log_level(config));
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// The `--stocks` file, else the configured stocks file, else the default seed.
pub fn load_catalog(
    stocks_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<InMemoryStockCatalog, MarketError> {
    let path = stocks_override
        .map(Path::to_path_buf)
        .or_else(|| stocks_file(config).map(PathBuf::from));

    match path {
        Some(path) => {
            eprintln!("Loading stocks from {}", path.display());
            let records = csv_adapter::load_stocks(&path)?;
            InMemoryStockCatalog::from_records(records)
        }
        None => Ok(InMemoryStockCatalog::with_default_stocks()),
    }
}

/// Records every row against `clock`, then reads each traded symbol's VWSP
/// and the all-share index. Stops at the first rejected trade.
pub fn replay(
    catalog: &dyn StockCatalog,
    rows: &[TradeRow],
    clock: &dyn Clock,
    config: MarketConfig,
) -> Result<ReplayReport, MarketError> {
    let mut log = InMemoryTradeLog::new();
    let mut market = Market::with_config(catalog, &mut log, clock, config);

    for row in rows {
        market.record_trade(&row.symbol, row.quantity, row.side, row.price)?;
    }

    let mut vwsp = BTreeMap::new();
    for symbol in market.trades().symbols_with_trades() {
        let price = market.volume_weighted_price(&symbol)?;
        vwsp.insert(symbol, price);
    }

    Ok(ReplayReport {
        recorded: rows.len(),
        vwsp,
        all_share_index: market.geometric_all_share_index(),
    })
}

fn print_stocks(catalog: &dyn StockCatalog) {
    println!(
        "{:<8} {:<10} {:>13} {:>14} {:>10}",
        "symbol", "type", "last_dividend", "fixed_dividend", "par_value"
    );
    for stock in catalog.list() {
        println!(
            "{:<8} {:<10} {:>13} {:>13}% {:>10}",
            stock.symbol,
            stock.stock_type,
            stock.last_dividend,
            stock.fixed_dividend_rate * 100.0,
            stock.par_value
        );
    }
}

fn run_dividend_yield(
    catalog: &dyn StockCatalog,
    symbol: &str,
    price: f64,
) -> Result<(), MarketError> {
    let mut log = InMemoryTradeLog::new();
    let market = Market::new(catalog, &mut log, &SystemClock);
    let dy = market.dividend_yield(&symbol.to_uppercase(), price)?;
    println!("{:.6}", dy);
    Ok(())
}

fn run_pe_ratio(catalog: &dyn StockCatalog, symbol: &str, price: f64) -> Result<(), MarketError> {
    let mut log = InMemoryTradeLog::new();
    let market = Market::new(catalog, &mut log, &SystemClock);
    match market.pe_ratio(&symbol.to_uppercase(), price)? {
        Some(pe) => println!("{:.6}", pe),
        None => println!("n/a"),
    }
    Ok(())
}

fn run_replay(
    catalog: &dyn StockCatalog,
    config: &dyn ConfigPort,
    trades_path: &Path,
) -> Result<(), MarketError> {
    let market_config = build_market_config(config)?;
    eprintln!("Loading trades from {}", trades_path.display());
    let rows = csv_adapter::load_trades(trades_path)?;

    let report = replay(catalog, &rows, &SystemClock, market_config)?;
    eprintln!("Recorded {} trades", report.recorded);

    for (symbol, vwsp) in &report.vwsp {
        match vwsp {
            Some(price) => println!("{}: VWSP {:.4}", symbol, price),
            None => println!("{}: VWSP n/a", symbol),
        }
    }
    match report.all_share_index {
        Some(index) => println!("All Share Index: {:.4}", index),
        None => println!("All Share Index: n/a"),
    }
    Ok(())
}
