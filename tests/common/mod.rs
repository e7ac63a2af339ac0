#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use tickerscope::domain::error::DataError;
use tickerscope::domain::frame::IndicatorParams;
use tickerscope::domain::history::HistoryRequest;
use tickerscope::domain::indicator::rsi::ZeroLossPolicy;
pub use tickerscope::domain::price_series::{PriceBar, PriceSeries};
use tickerscope::ports::data_port::MarketDataPort;

pub struct MockMarketData {
    pub data: HashMap<String, PriceSeries>,
    pub errors: HashMap<String, DataError>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, symbol: &str, closes: &[f64]) -> Self {
        self.data
            .insert(symbol.to_string(), make_series(symbol, closes));
        self
    }

    pub fn with_error(mut self, symbol: &str, error: DataError) -> Self {
        self.errors.insert(symbol.to_string(), error);
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_prices(
        &self,
        symbol: &str,
        _request: &HistoryRequest,
    ) -> Result<PriceSeries, DataError> {
        if let Some(err) = self.errors.get(symbol) {
            return Err(err.clone());
        }
        self.data.get(symbol).cloned().ok_or_else(|| DataError::NoData {
            symbol: symbol.to_string(),
        })
    }
}

pub fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn make_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            timestamp: start() + Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
        })
        .collect();
    PriceSeries::new(symbol, bars).unwrap()
}

pub fn small_params() -> IndicatorParams {
    IndicatorParams {
        sma_short: 2,
        sma_long: 3,
        rsi_period: 5,
        zero_loss: ZeroLossPolicy::Clamp,
    }
}

/// Falls for five bars then climbs; SMA(2) crosses above SMA(3) at index 6.
pub const V_SHAPE: [f64; 9] = [20.0, 19.0, 18.0, 17.0, 16.0, 17.0, 19.0, 21.0, 23.0];

/// Climbs then falls; SMA(2) crosses below SMA(3) at index 6.
pub const PEAK: [f64; 9] = [16.0, 17.0, 18.0, 19.0, 20.0, 19.0, 17.0, 15.0, 13.0];

pub fn linear(count: usize, first: f64, step: f64) -> Vec<f64> {
    (0..count).map(|i| first + step * i as f64).collect()
}

pub fn csv_text(rows: &[(&str, f64)]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for (date, close) in rows {
        out.push_str(&format!("{date},{close},{close},{close},{close},100\n"));
    }
    out
}
