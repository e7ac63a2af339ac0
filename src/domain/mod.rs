//! Core domain types and logic.

pub mod price_series;
pub mod history;
pub mod indicator;
pub mod frame;
pub mod signal;
pub mod dashboard;
pub mod universe;
pub mod config_validation;
pub mod error;
