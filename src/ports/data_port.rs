//! Market data port trait.

use crate::domain::error::DataError;
use crate::domain::history::HistoryRequest;
use crate::domain::price_series::PriceSeries;

/// Source of price history for a symbol.
///
/// Implementations normalise whatever shape their source delivers into a
/// validated [`PriceSeries`]. An empty result is reported as
/// [`DataError::NoData`], never as an empty series.
pub trait MarketDataPort {
    fn fetch_prices(&self, symbol: &str, request: &HistoryRequest) -> Result<PriceSeries, DataError>;
}
