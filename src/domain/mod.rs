//! Core domain types and logic.

pub mod stock;
pub mod trade;
pub mod pricing;
pub mod market;
pub mod config_validation;
pub mod error;
