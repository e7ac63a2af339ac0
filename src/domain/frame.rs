//! IndicatorFrame: all indicators for one price series, row-aligned.

use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::rsi::{ZeroLossPolicy, calculate_rsi};
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::price_series::{PriceBar, PriceSeries};
use chrono::NaiveDateTime;

pub const DEFAULT_SMA_SHORT: usize = 20;
pub const DEFAULT_SMA_LONG: usize = 50;
pub const DEFAULT_RSI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub zero_loss: ZeroLossPolicy,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: DEFAULT_SMA_SHORT,
            sma_long: DEFAULT_SMA_LONG,
            rsi_period: DEFAULT_RSI_PERIOD,
            zero_loss: ZeroLossPolicy::Clamp,
        }
    }
}

impl IndicatorParams {
    /// Observations required before a signal may be anything but Hold.
    pub fn min_observations(&self) -> usize {
        self.sma_long.max(self.rsi_period)
    }
}

/// One row of an [`IndicatorFrame`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow<'a> {
    pub bar: &'a PriceBar,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
}

impl FrameRow<'_> {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.bar.timestamp
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }

    /// `Some(true)` when the short average is strictly above the long one.
    pub fn short_above_long(&self) -> Option<bool> {
        Some(self.sma_short? > self.sma_long?)
    }
}

/// Indicators derived from a [`PriceSeries`], recomputed from scratch on
/// every call to [`IndicatorFrame::compute`] and never modified afterwards.
#[derive(Debug, Clone)]
pub struct IndicatorFrame {
    series: PriceSeries,
    params: IndicatorParams,
    sma_short: IndicatorSeries,
    sma_long: IndicatorSeries,
    rsi: IndicatorSeries,
}

impl IndicatorFrame {
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Self {
        Self {
            series: series.clone(),
            params: *params,
            sma_short: calculate_sma(series, params.sma_short),
            sma_long: calculate_sma(series, params.sma_long),
            rsi: calculate_rsi(series, params.rsi_period, params.zero_loss),
        }
    }

    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    pub fn sma_short(&self) -> &IndicatorSeries {
        &self.sma_short
    }

    pub fn sma_long(&self) -> &IndicatorSeries {
        &self.sma_long
    }

    pub fn rsi(&self) -> &IndicatorSeries {
        &self.rsi
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<FrameRow<'_>> {
        let bar = self.series.bars().get(index)?;
        Some(FrameRow {
            bar,
            sma_short: self.sma_short.get(index),
            sma_long: self.sma_long.get(index),
            rsi: self.rsi.get(index),
        })
    }

    pub fn latest(&self) -> Option<FrameRow<'_>> {
        self.len().checked_sub(1).and_then(|i| self.row(i))
    }

    pub fn rows(&self) -> impl Iterator<Item = FrameRow<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.row(i))
    }
}
