//! tickerscope: technical signal dashboard for stocks and crypto.
//!
//! Hexagonal architecture: indicator and signal logic in [`domain`], port
//! traits in [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
pub mod scheduler;
