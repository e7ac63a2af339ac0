//! Validated price series.

use crate::domain::error::DataError;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Time-ordered bars for one symbol.
///
/// Timestamps are strictly increasing and every open/close is a positive
/// finite number. The only way to build one is [`PriceSeries::new`], so the
/// indicator code can rely on both.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, DataError> {
        let symbol = symbol.into();
        let malformed = |reason: String| DataError::Malformed {
            symbol: symbol.clone(),
            reason,
        };

        for (i, bar) in bars.iter().enumerate() {
            if !is_valid_price(bar.close) {
                return Err(malformed(format!(
                    "close {} at {} is not a positive price",
                    bar.close, bar.timestamp
                )));
            }
            if !is_valid_price(bar.open) {
                return Err(malformed(format!(
                    "open {} at {} is not a positive price",
                    bar.open, bar.timestamp
                )));
            }
            if i > 0 && bar.timestamp <= bars[i - 1].timestamp {
                return Err(malformed(format!(
                    "timestamp {} does not follow {}",
                    bar.timestamp,
                    bars[i - 1].timestamp
                )));
            }
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Change of the last close against the one before it, in percent.
    ///
    /// A single-bar series compares the close with itself and yields 0.
    pub fn percent_change(&self) -> Option<f64> {
        let latest = self.latest_close()?;
        let prev = match self.bars.len() {
            n if n > 1 => self.bars[n - 2].close,
            _ => latest,
        };
        Some((latest - prev) / prev * 100.0)
    }
}

fn is_valid_price(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            timestamp: ts(day),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn accepts_ordered_positive_bars() {
        let series = PriceSeries::new("AAPL", vec![bar(1, 10.0), bar(2, 11.0)]).unwrap();
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn empty_series_is_allowed() {
        let series = PriceSeries::new("AAPL", vec![]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.latest_close(), None);
        assert_eq!(series.percent_change(), None);
    }

    #[test]
    fn rejects_zero_close() {
        let err = PriceSeries::new("AAPL", vec![bar(1, 10.0), bar(2, 0.0)]).unwrap_err();
        assert!(matches!(err, DataError::Malformed { ref symbol, .. } if symbol == "AAPL"));
    }

    #[test]
    fn rejects_nan_open() {
        let mut b = bar(1, 10.0);
        b.open = f64::NAN;
        assert!(PriceSeries::new("AAPL", vec![b]).is_err());
    }

    #[test]
    fn rejects_duplicate_timestamp() {
        let err = PriceSeries::new("AAPL", vec![bar(1, 10.0), bar(1, 11.0)]).unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[test]
    fn rejects_out_of_order() {
        assert!(PriceSeries::new("AAPL", vec![bar(2, 10.0), bar(1, 11.0)]).is_err());
    }

    #[test]
    fn percent_change_against_previous_close() {
        let series = PriceSeries::new("AAPL", vec![bar(1, 100.0), bar(2, 105.0)]).unwrap();
        let change = series.percent_change().unwrap();
        assert!((change - 5.0).abs() < 1e-12);
    }

    #[test]
    fn percent_change_single_bar_is_zero() {
        let series = PriceSeries::new("AAPL", vec![bar(1, 100.0)]).unwrap();
        assert_eq!(series.percent_change(), Some(0.0));
    }
}
