//! Configuration validation.
//!
//! Validates every dashboard setting before a scan runs. Window bounds match
//! the ranges the dashboard has always offered for its inputs.

use crate::domain::error::TickerscopeError;
use crate::domain::history::{HistoryPeriod, SampleInterval};
use crate::domain::indicator::rsi::ZeroLossPolicy;
use crate::domain::signal::SignalPolicy;
use crate::ports::config_port::ConfigPort;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const SMA_SHORT_RANGE: RangeInclusive<i64> = 1..=200;
pub const SMA_LONG_RANGE: RangeInclusive<i64> = 2..=400;
pub const RSI_PERIOD_RANGE: RangeInclusive<i64> = 5..=30;

pub fn validate_dashboard_config(config: &dyn ConfigPort) -> Result<(), TickerscopeError> {
    validate_history(config)?;
    validate_refresh(config)?;
    validate_max_points(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), TickerscopeError> {
    validate_window(config, "sma_short", 20, SMA_SHORT_RANGE)?;
    validate_window(config, "sma_long", 50, SMA_LONG_RANGE)?;
    validate_window(config, "rsi_period", 14, RSI_PERIOD_RANGE)?;
    validate_parsed::<ZeroLossPolicy>(config, "indicators", "rsi_zero_loss")?;
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), TickerscopeError> {
    validate_parsed::<SignalPolicy>(config, "signal", "policy")?;

    let oversold = threshold(config, "oversold", 30.0)?;
    let overbought = threshold(config, "overbought", 70.0)?;
    if oversold >= overbought {
        return Err(TickerscopeError::invalid(
            "signal",
            "oversold",
            "oversold must be below overbought",
        ));
    }

    threshold(config, "trend_buy_rsi_below", 60.0)?;
    threshold(config, "trend_sell_rsi_above", 50.0)?;
    Ok(())
}

pub fn validate_all(config: &dyn ConfigPort) -> Result<(), TickerscopeError> {
    validate_dashboard_config(config)?;
    validate_indicator_config(config)?;
    validate_signal_config(config)?;
    Ok(())
}

fn validate_history(config: &dyn ConfigPort) -> Result<(), TickerscopeError> {
    validate_parsed::<HistoryPeriod>(config, "dashboard", "period")?;
    validate_parsed::<SampleInterval>(config, "dashboard", "interval")?;
    Ok(())
}

fn validate_refresh(config: &dyn ConfigPort) -> Result<(), TickerscopeError> {
    let value = validate_numeric::<i64>(config, "dashboard", "refresh_seconds")?.unwrap_or(30);
    if value < 1 {
        return Err(TickerscopeError::invalid(
            "dashboard",
            "refresh_seconds",
            "refresh_seconds must be at least 1",
        ));
    }
    Ok(())
}

fn validate_max_points(config: &dyn ConfigPort) -> Result<(), TickerscopeError> {
    let value = validate_numeric::<i64>(config, "dashboard", "max_points")?.unwrap_or(500);
    if value < 1 {
        return Err(TickerscopeError::invalid(
            "dashboard",
            "max_points",
            "max_points must be at least 1",
        ));
    }
    Ok(())
}

fn validate_window(
    config: &dyn ConfigPort,
    key: &str,
    default: i64,
    range: RangeInclusive<i64>,
) -> Result<(), TickerscopeError> {
    let value = validate_numeric::<i64>(config, "indicators", key)?.unwrap_or(default);
    if !range.contains(&value) {
        return Err(TickerscopeError::invalid(
            "indicators",
            key,
            format!(
                "{} must be between {} and {}",
                key,
                range.start(),
                range.end()
            ),
        ));
    }
    Ok(())
}

/// Reads a `[signal]` threshold and checks it lies in [0, 100].
fn threshold(config: &dyn ConfigPort, key: &str, default: f64) -> Result<f64, TickerscopeError> {
    let value = validate_numeric::<f64>(config, "signal", key)?.unwrap_or(default);
    if !(0.0..=100.0).contains(&value) {
        return Err(TickerscopeError::invalid(
            "signal",
            key,
            format!("{key} must be between 0 and 100"),
        ));
    }
    Ok(value)
}

/// Parses a numeric value if present. `None` means the key is absent or blank.
fn validate_numeric<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, TickerscopeError> {
    match config.get_non_empty(section, key) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            TickerscopeError::invalid(section, key, format!("'{raw}' is not a number"))
        }),
        None => Ok(None),
    }
}

fn validate_parsed<T: FromStr<Err = String>>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), TickerscopeError> {
    match config.get_non_empty(section, key) {
        Some(raw) => raw
            .parse::<T>()
            .map(|_| ())
            .map_err(|reason| TickerscopeError::invalid(section, key, reason)),
        None => Ok(()),
    }
}
