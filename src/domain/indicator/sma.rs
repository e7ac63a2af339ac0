//! Simple Moving Average.
//!
//! SMA(n)[i] = sum(C[i-j] for j in 0..n) / n
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::price_series::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, window: usize) -> IndicatorSeries {
    if window == 0 {
        return IndicatorSeries::all_undefined(IndicatorType::Sma(window), series);
    }

    let bars = series.bars();
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i + 1 < window {
            values.push(IndicatorPoint::undefined(bar.timestamp));
            continue;
        }
        let start = i + 1 - window;
        let mean = bars[start..=i].iter().map(|b| b.close).sum::<f64>() / window as f64;
        values.push(IndicatorPoint::defined(bar.timestamp, mean));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(window),
        values,
    }
}
