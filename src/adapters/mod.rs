//! Concrete adapter implementations for ports.

pub mod csv_market_data;
pub mod file_config_adapter;
pub mod csv_export;
pub mod table;
