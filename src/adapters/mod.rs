//! Concrete adapter implementations for ports.

pub mod clock;
pub mod csv_adapter;
pub mod file_config_adapter;
pub mod memory_catalog;
pub mod memory_trade_log;
