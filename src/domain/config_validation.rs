//! Configuration validation and building.
//!
//! Every key is optional; a missing key takes its default. Present keys must
//! hold sensible values.

use crate::domain::error::MarketError;
use crate::domain::market::{MarketConfig, DEFAULT_VWSP_WINDOW_SECONDS};
use crate::ports::config_port::ConfigPort;
use chrono::Duration;
use log::LevelFilter;

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub fn validate_market_config(config: &dyn ConfigPort) -> Result<(), MarketError> {
    validate_window(config)?;
    validate_stocks_file(config)?;
    validate_log_level(config)?;
    Ok(())
}

pub fn build_market_config(config: &dyn ConfigPort) -> Result<MarketConfig, MarketError> {
    validate_window(config)?;
    let seconds = config.get_int("market", "window_seconds", DEFAULT_VWSP_WINDOW_SECONDS);
    Ok(MarketConfig {
        window: Duration::seconds(seconds),
    })
}

/// The configured stock data file, if any.
pub fn stocks_file(config: &dyn ConfigPort) -> Option<String> {
    config
        .get_string("market", "stocks_file")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn log_level(config: &dyn ConfigPort) -> String {
    config
        .get_string("log", "level")
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), MarketError> {
    let Some(raw) = config.get_string("market", "window_seconds") else {
        return Ok(());
    };
    let invalid = |reason: &str| MarketError::ConfigInvalid {
        section: "market".to_string(),
        key: "window_seconds".to_string(),
        reason: reason.to_string(),
    };
    let seconds: i64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("window_seconds must be a whole number"))?;
    // At most one day.
    if seconds <= 0 || seconds > 86_400 {
        return Err(invalid("window_seconds must be between 1 and 86400"));
    }
    Ok(())
}

fn validate_stocks_file(config: &dyn ConfigPort) -> Result<(), MarketError> {
    match config.get_string("market", "stocks_file") {
        Some(s) if s.trim().is_empty() => Err(MarketError::ConfigInvalid {
            section: "market".to_string(),
            key: "stocks_file".to_string(),
            reason: "stocks_file must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), MarketError> {
    let level = log_level(config);
    if level.parse::<LevelFilter>().is_err() {
        return Err(MarketError::ConfigInvalid {
            section: "log".to_string(),
            key: "level".to_string(),
            reason: format!("unknown log level '{}'", level),
        });
    }
    Ok(())
}
