//! RSI (Relative Strength Index).
//!
//! Average gain/loss are plain rolling means over the last n price changes,
//! not Wilder's smoothing:
//! - change[i] = C[i] - C[i-1]
//! - avg_gain[i] = mean(max(change, 0)) over changes i-n+1..=i
//! - avg_loss[i] = mean(max(-change, 0)) over the same changes
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! Warmup: first n bars are invalid (bar 0 has no change).
//! A window with no losses is resolved by [`ZeroLossPolicy`]; a window with
//! neither gains nor losses is always invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;
use std::fmt;
use std::str::FromStr;

/// What RSI reports when the window has gains but zero average loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroLossPolicy {
    /// RSI = 100.
    #[default]
    Clamp,
    /// The point is left undefined.
    Undefined,
}

impl FromStr for ZeroLossPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamp" => Ok(ZeroLossPolicy::Clamp),
            "undefined" => Ok(ZeroLossPolicy::Undefined),
            other => Err(format!("unknown zero-loss policy '{other}' (expected clamp or undefined)")),
        }
    }
}

impl fmt::Display for ZeroLossPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroLossPolicy::Clamp => write!(f, "clamp"),
            ZeroLossPolicy::Undefined => write!(f, "undefined"),
        }
    }
}

pub fn calculate_rsi(series: &PriceSeries, period: usize, policy: ZeroLossPolicy) -> IndicatorSeries {
    let bars = series.bars();
    if period == 0 || bars.len() < 2 {
        return IndicatorSeries::all_undefined(IndicatorType::Rsi(period), series);
    }

    // gains[k] / losses[k] belong to the change ending at bar k + 1.
    let mut gains = Vec::with_capacity(bars.len() - 1);
    let mut losses = Vec::with_capacity(bars.len() - 1);
    for pair in bars.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut values = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i < period {
            values.push(IndicatorPoint::undefined(bar.timestamp));
            continue;
        }

        let window = (i - period)..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;

        let point = match rsi_value(avg_gain, avg_loss, policy) {
            Some(rsi) => IndicatorPoint::defined(bar.timestamp, rsi),
            None => IndicatorPoint::undefined(bar.timestamp),
        };
        values.push(point);
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64, policy: ZeroLossPolicy) -> Option<f64> {
    if avg_loss == 0.0 {
        return match policy {
            ZeroLossPolicy::Clamp if avg_gain > 0.0 => Some(100.0),
            _ => None,
        };
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}
