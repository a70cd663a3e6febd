//! stockmetrics — dividend yield, P/E ratio, volume weighted stock price and
//! a geometric all-share index over an in-memory market.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
