//! Port traits implemented by adapters.

pub mod clock_port;
pub mod config_port;
pub mod stock_catalog_port;
pub mod trade_log_port;
